use std::fmt;
use time::OffsetDateTime;

/// A cookie as held by a host jar.
/// Modeled after Chromium's `net::CanonicalCookie`, reduced to what a
/// script-visible cookie jar tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    /// Raw value as written by the setter string (still percent-encoded).
    pub value: String,
    /// Explicit `domain` attribute; `None` for host-only cookies.
    pub domain: Option<String>,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl CanonicalCookie {
    pub fn new(name: String, value: String, path: String, creation_time: OffsetDateTime) -> Self {
        Self {
            name,
            value,
            domain: None,
            path,
            creation_time,
            expiration_time: None,
            secure: false,
            same_site: None,
        }
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expiration_time
            .is_some_and(|expiry| expiry <= current_time)
    }

    /// Cookies are identified by name, path and domain.
    pub fn same_key(&self, other: &CanonicalCookie) -> bool {
        self.name == other.name && self.path == other.path && self.domain == other.domain
    }

    pub fn record(&self) -> CookieRecord {
        CookieRecord {
            name: self.name.clone(),
            path: Some(self.path.clone()),
            domain: self.domain.clone(),
        }
    }
}

/// One entry of a host's bulk enumeration, enough to remove the cookie again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub path: Option<String>,
    pub domain: Option<String>,
}

impl CookieRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            domain: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Lax => f.write_str("Lax"),
            SameSite::Strict => f.write_str("Strict"),
            SameSite::None => f.write_str("None"),
        }
    }
}

impl From<cookie::SameSite> for SameSite {
    fn from(value: cookie::SameSite) -> Self {
        match value {
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::None => SameSite::None,
        }
    }
}

/// Lifetime of a written cookie.
///
/// Numeric lifetimes are relative seconds and serialize as `max-age`;
/// anything else is an absolute date and serializes as `expires`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiry {
    MaxAge(i64),
    Expires(String),
}

impl Expiry {
    /// Interpret a user-supplied lifetime. Finite numeric strings become
    /// `MaxAge`, truncated toward zero (`"1.5"` is one second), everything
    /// else is passed through as an `expires` date.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() => Expiry::MaxAge(secs.trunc() as i64),
            _ => Expiry::Expires(input.to_string()),
        }
    }
}

impl From<i64> for Expiry {
    fn from(secs: i64) -> Self {
        Expiry::MaxAge(secs)
    }
}

impl From<i32> for Expiry {
    fn from(secs: i32) -> Self {
        Expiry::MaxAge(i64::from(secs))
    }
}

impl From<&str> for Expiry {
    fn from(input: &str) -> Self {
        Expiry::parse(input)
    }
}

impl From<String> for Expiry {
    fn from(input: String) -> Self {
        Expiry::parse(&input)
    }
}

/// Optional attributes for a cookie write. Absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieAttributes {
    pub expires: Option<Expiry>,
    /// Defaults to `/` when absent.
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl CookieAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expires(mut self, expires: impl Into<Expiry>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}
