//! Cookie change events.
//!
//! A host delivers raw [`ChangeNotification`]s; the [`ChangeClassifier`]
//! diffs them against the previous snapshot and the [`EventDispatcher`]
//! fans the resulting `insert`/`update`/`delete`/`clear` event, followed by
//! `change`, out to subscribers.

mod classifier;
mod dispatcher;
mod notification;

pub use classifier::{ChangeClassifier, Classification};
pub use dispatcher::{EventDispatcher, Handler};
pub use notification::{ChangeNotification, ChangedCookie, CookieEvent, EventType, UnknownEventType};
