//! Cookie parsing, serialization and storage.
//!
//! - **Codec**: header decoding into a [`Snapshot`] and setter-string encoding ([`codec`])
//! - **Snapshots**: immutable decoded views and the store holding the live one ([`snapshot`])
//! - **Dates**: loose date/time input to GMT `expires` strings ([`utc`])
//! - **Hosts**: the storage trait ([`CookieHost`]) and an in-memory jar ([`CookieMonster`])
//!
//! # Architecture
//!
//! | Browser | cookie-events | Responsibility |
//! |---------|---------------|----------------|
//! | `document.cookie` getter | [`CookieHost::cookie_header`] | Script-visible header |
//! | `document.cookie` setter | [`CookieHost::set_cookie_header`] | Apply one setter string |
//! | `cookieStore.getAll()` | [`CookieHost::get_all`] | Bulk enumeration |
//! | `cookieStore.onchange` | [`ChangeNotification`](crate::events::ChangeNotification) | Raw change events |
//!
//! # Decoding
//!
//! ```rust
//! use cookie_events::cookies::Snapshot;
//! use serde_json::json;
//!
//! let snapshot = Snapshot::parse("theme=dark; prefs=%7B%22size%22%3A12%7D");
//! assert_eq!(snapshot.get("theme"), Some(&json!("dark")));
//! assert_eq!(snapshot.get("prefs"), Some(&json!({"size": 12})));
//! assert_eq!(snapshot.get("missing"), None);
//! ```

pub mod canonicalcookie;
pub mod codec;
pub mod host;
pub mod monster;
pub mod snapshot;
pub mod utc;

pub use canonicalcookie::{CanonicalCookie, CookieAttributes, CookieRecord, Expiry, SameSite};
pub use host::{CookieHost, Enumerating};
pub use monster::CookieMonster;
pub use snapshot::{Snapshot, SnapshotStore};
pub use utc::{DateOrder, DateResolver};
