use crate::cookies::canonicalcookie::{CanonicalCookie, CookieRecord};
use crate::cookies::codec::SEPARATOR;
use crate::cookies::host::{CookieHost, Enumerating};
use crate::events::{ChangeNotification, ChangedCookie};
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;
use tokio::sync::mpsc;

/// Target name stamped on notifications emitted by the jar.
pub const NOTIFICATION_TARGET: &str = "CookieMonster";

/// In-memory cookie jar that behaves like a browser's script-visible jar.
/// Modeled after Chromium's `net::CookieMonster`.
///
/// Setter strings are parsed with the `cookie` crate. Every effective write
/// or removal is reported as a [`ChangeNotification`] on the optional change
/// stream.
pub struct CookieMonster {
    // Insertion order; overwrites keep their slot and creation time.
    store: Mutex<Vec<CanonicalCookie>>,
    changes: Option<mpsc::UnboundedSender<ChangeNotification>>,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Vec::new()),
            changes: None,
        }
    }

    /// Create a jar that reports its changes on the returned receiver.
    pub fn with_change_stream() -> (Self, mpsc::UnboundedReceiver<ChangeNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let monster = Self {
            store: Mutex::new(Vec::new()),
            changes: Some(tx),
        };
        (monster, rx)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CanonicalCookie>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `cookie`, or remove its counterpart if it is already expired.
    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) {
        let now = OffsetDateTime::now_utc();
        let mut store = self.lock();
        store.retain(|c| !c.is_expired(now));

        let existing = store.iter().position(|c| c.same_key(&cookie));

        if cookie.is_expired(now) {
            if let Some(idx) = existing {
                store.remove(idx);
                drop(store);
                tracing::debug!(name = %cookie.name, "cookie removed");
                self.notify(ChangeNotification::for_delete(cookie.name));
            }
            return;
        }

        let changed = ChangedCookie::new(cookie.name.clone(), cookie.value.clone());
        match existing {
            Some(idx) => {
                let creation_time = store[idx].creation_time;
                store[idx] = CanonicalCookie {
                    creation_time,
                    ..cookie
                };
            }
            None => store.push(cookie),
        }
        drop(store);

        tracing::debug!(name = %changed.name, "cookie stored");
        self.notify(ChangeNotification::new(vec![changed], Vec::new()));
    }

    /// Parse a setter string and apply it.
    pub fn parse_and_save_cookie(&self, cookie_line: &str) {
        use cookie::Cookie;

        let parsed = match Cookie::parse(cookie_line) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, line = %cookie_line, "failed to parse cookie");
                return;
            }
        };

        let now = OffsetDateTime::now_utc();

        // Max-Age takes precedence over Expires.
        let expiration_time = match parsed.max_age() {
            Some(max_age) => now.checked_add(max_age),
            None => parsed.expires().and_then(|e| e.datetime()),
        };

        let domain = parsed
            .domain()
            .map(|d| d.trim_start_matches('.').to_lowercase());

        let cookie = CanonicalCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path: parsed.path().unwrap_or("/").to_string(),
            creation_time: now,
            expiration_time,
            secure: parsed.secure().unwrap_or(false),
            same_site: parsed.same_site().map(Into::into),
        };

        self.set_canonical_cookie(cookie);
    }

    /// Live cookies, longest path first, then oldest first.
    pub fn iter_all_cookies(&self) -> Vec<CanonicalCookie> {
        let now = OffsetDateTime::now_utc();
        let mut cookies: Vec<_> = self
            .lock()
            .iter()
            .filter(|c| !c.is_expired(now))
            .cloned()
            .collect();

        // Stable sort keeps insertion order for equal keys.
        cookies.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });
        cookies
    }

    /// Get total live cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.iter_all_cookies().len()
    }

    /// Drop every cookie without emitting notifications.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn notify(&self, notification: ChangeNotification) {
        if let Some(tx) = &self.changes {
            // Receivers may lag behind later writes, so carry the state as of this change.
            let notification = notification
                .with_target(NOTIFICATION_TARGET)
                .with_header(self.cookie_header());
            if tx.send(notification).is_err() {
                tracing::trace!("change stream receiver dropped");
            }
        }
    }
}

impl CookieHost for CookieMonster {
    fn cookie_header(&self) -> String {
        self.iter_all_cookies()
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    fn set_cookie_header(&self, setter: &str) {
        self.parse_and_save_cookie(setter);
    }

    fn get_all(&self) -> Enumerating {
        let records: Vec<CookieRecord> = self
            .iter_all_cookies()
            .iter()
            .map(CanonicalCookie::record)
            .collect();
        Box::pin(async move { Ok(records) })
    }
}
