//! Turns raw change notifications into semantic event categories.

use crate::cookies::codec;
use crate::cookies::snapshot::Snapshot;
use crate::events::notification::{ChangeNotification, EventType};
use std::sync::Arc;

/// Outcome of classifying one notification.
#[derive(Debug, Clone)]
pub struct Classification {
    /// The categorical event, if any. `Change` is never returned here since
    /// it fires for every notification.
    pub kind: Option<EventType>,
    /// Snapshot decoded from the header after the change.
    pub snapshot: Arc<Snapshot>,
}

/// Stateless classifier; the prior snapshot is supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeClassifier;

impl ChangeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `notification` against `prior`, decoding `header` as the new state.
    pub fn classify(
        &self,
        prior: &Snapshot,
        notification: &ChangeNotification,
        header: &str,
    ) -> Classification {
        let snapshot = Arc::new(codec::decode(header));
        let kind = self.classify_snapshots(prior, notification, &snapshot);
        Classification { kind, snapshot }
    }

    /// First matching rule wins: update, insert, then delete/clear.
    ///
    /// Only the first changed cookie is inspected.
    pub fn classify_snapshots(
        &self,
        prior: &Snapshot,
        notification: &ChangeNotification,
        current: &Snapshot,
    ) -> Option<EventType> {
        if notification.changed.len() > 1 {
            tracing::debug!(
                count = notification.changed.len(),
                "batched change notification, classifying first cookie only"
            );
        }

        if let Some(first) = notification.changed.first() {
            match prior.get(&first.name) {
                Some(previous) => {
                    if codec::display_value(previous) != codec::percent_decode(&first.value) {
                        return Some(EventType::Update);
                    }
                }
                None => return Some(EventType::Insert),
            }
        }

        if !notification.deleted.is_empty() || notification.changed.is_empty() {
            return Some(if current.is_empty() {
                EventType::Clear
            } else {
                EventType::Delete
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::notification::ChangedCookie;

    fn classify(prior: &str, notification: &ChangeNotification, header: &str) -> Option<EventType> {
        ChangeClassifier::new()
            .classify(&Snapshot::parse(prior), notification, header)
            .kind
    }

    #[test]
    fn test_insert_into_empty() {
        let result = ChangeClassifier::new().classify(
            &Snapshot::parse(""),
            &ChangeNotification::for_change("a", "1"),
            "a=1",
        );
        assert_eq!(result.kind, Some(EventType::Insert));
        assert_eq!(result.snapshot.get("a"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn test_update_existing() {
        let kind = classify("a=1", &ChangeNotification::for_change("a", "2"), "a=2");
        assert_eq!(kind, Some(EventType::Update));
    }

    #[test]
    fn test_update_compares_decoded_values() {
        let kind = classify(
            "o=%7B%22a%22%3A1%7D",
            &ChangeNotification::for_change("o", "%7B%22a%22%3A1%7D"),
            "o=%7B%22a%22%3A1%7D",
        );
        // Objects coerce to "[object Object]", so any object rewrite is an update.
        assert_eq!(kind, Some(EventType::Update));

        let kind = classify(
            "s=hello%20world",
            &ChangeNotification::for_change("s", "hello%20world"),
            "s=hello%20world",
        );
        assert_eq!(kind, None);
    }

    #[test]
    fn test_same_value_rewrite_is_uncategorized() {
        let kind = classify("a=1", &ChangeNotification::for_change("a", "1"), "a=1");
        assert_eq!(kind, None);
    }

    #[test]
    fn test_clear_when_header_empty() {
        let kind = classify("a=1", &ChangeNotification::for_delete("a"), "");
        assert_eq!(kind, Some(EventType::Clear));
    }

    #[test]
    fn test_delete_when_cookies_remain() {
        let kind = classify("a=1; b=2", &ChangeNotification::for_delete("a"), "b=2");
        assert_eq!(kind, Some(EventType::Delete));
    }

    #[test]
    fn test_empty_notification_is_delete_or_clear() {
        let empty = ChangeNotification::new(Vec::new(), Vec::new());
        assert_eq!(classify("a=1", &empty, "a=1"), Some(EventType::Delete));
        assert_eq!(classify("", &empty, ""), Some(EventType::Clear));
    }

    #[test]
    fn test_only_first_changed_entry_counts() {
        let notification = ChangeNotification::new(
            vec![ChangedCookie::new("a", "1"), ChangedCookie::new("b", "9")],
            Vec::new(),
        );
        // "a" is unchanged and "b" is new, but only "a" is looked at.
        assert_eq!(classify("a=1", &notification, "a=1; b=9"), None);
    }

    #[test]
    fn test_changed_with_deletions_prefers_insert() {
        let notification =
            ChangeNotification::new(vec![ChangedCookie::new("c", "3")], vec!["a".to_string()]);
        assert_eq!(
            classify("a=1", &notification, "c=3"),
            Some(EventType::Insert)
        );
    }
}
