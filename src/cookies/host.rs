//! The external owner of cookie storage.
//!
//! In a browser this is `document.cookie` plus the Cookie Store API; in
//! tests and headless embeddings it is usually a
//! [`CookieMonster`](crate::cookies::monster::CookieMonster).

use crate::cookies::canonicalcookie::CookieRecord;
use std::{future::Future, io, pin::Pin, sync::Arc};

/// Alias for the `Future` returned by a host's bulk enumeration.
pub type Enumerating = Pin<Box<dyn Future<Output = io::Result<Vec<CookieRecord>>> + Send>>;

/// Access to the host's cookie storage.
///
/// Implementations must be thread-safe. Change notifications are not part
/// of this trait; the host delivers them to
/// [`CookieClient::handle_change`](crate::client::CookieClient::handle_change)
/// or through a channel given to
/// [`CookieClient::watch`](crate::client::CookieClient::watch).
pub trait CookieHost: Send + Sync {
    /// The script-visible cookie header, e.g. `a=1; b=2`.
    fn cookie_header(&self) -> String;

    /// Apply one setter string, e.g. `a=1; max-age=60; path=/`.
    fn set_cookie_header(&self, setter: &str);

    /// Enumerate every stored cookie.
    fn get_all(&self) -> Enumerating;
}

/// Blanket implementation for Arc-wrapped hosts.
impl<H: CookieHost + ?Sized> CookieHost for Arc<H> {
    fn cookie_header(&self) -> String {
        (**self).cookie_header()
    }

    fn set_cookie_header(&self, setter: &str) {
        (**self).set_cookie_header(setter)
    }

    fn get_all(&self) -> Enumerating {
        (**self).get_all()
    }
}
