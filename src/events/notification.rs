use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;

/// A cookie written or overwritten, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedCookie {
    pub name: String,
    /// Raw stored value; may still be percent-encoded.
    pub value: String,
}

impl ChangedCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One raw change event delivered by the host's change observation facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub changed: Vec<ChangedCookie>,
    /// Names of removed cookies.
    pub deleted: Vec<String>,
    pub timestamp: OffsetDateTime,
    pub target: Option<String>,
    /// Cookie header right after this change, when the host can supply it.
    /// Classification falls back to re-reading the host when absent.
    pub header: Option<String>,
}

impl ChangeNotification {
    pub fn new(changed: Vec<ChangedCookie>, deleted: Vec<String>) -> Self {
        Self {
            changed,
            deleted,
            timestamp: OffsetDateTime::now_utc(),
            target: None,
            header: None,
        }
    }

    pub fn for_change(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(vec![ChangedCookie::new(name, value)], Vec::new())
    }

    pub fn for_delete(name: impl Into<String>) -> Self {
        Self::new(Vec::new(), vec![name.into()])
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// Semantic event categories a subscriber can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Insert,
    Update,
    Delete,
    Clear,
    /// Fires once for every notification, after the categorical event.
    Change,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Insert,
        EventType::Update,
        EventType::Delete,
        EventType::Clear,
        EventType::Change,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Insert => "insert",
            EventType::Update => "update",
            EventType::Delete => "delete",
            EventType::Clear => "clear",
            EventType::Change => "change",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cookie event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// Normalized payload handed to subscribers. Built fresh per dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieEvent {
    pub kind: EventType,
    pub changed: Vec<ChangedCookie>,
    pub deleted: Vec<String>,
    pub target: Option<String>,
    pub timestamp: OffsetDateTime,
    pub origin: ChangeNotification,
}

impl CookieEvent {
    pub fn new(kind: EventType, origin: &ChangeNotification) -> Self {
        Self {
            kind,
            changed: origin.changed.clone(),
            deleted: origin.deleted.clone(),
            target: origin.target.clone(),
            timestamp: origin.timestamp,
            origin: origin.clone(),
        }
    }
}
