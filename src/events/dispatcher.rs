//! Per-category subscriber lists and synchronous dispatch.

use crate::events::notification::{ChangeNotification, CookieEvent, EventType};
use dashmap::DashMap;
use std::sync::Arc;

/// A subscriber callback.
pub type Handler = Arc<dyn Fn(&CookieEvent) + Send + Sync>;

/// Subscriber registry keyed by [`EventType`]. Append-only.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: DashMap<EventType, Vec<Handler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under every whitespace-separated type in `types`.
    ///
    /// Unknown type names are skipped. Returns `self` for chaining.
    pub fn subscribe<F>(&self, types: &str, handler: F) -> &Self
    where
        F: Fn(&CookieEvent) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        for name in types.split_whitespace() {
            match name.parse::<EventType>() {
                Ok(kind) => {
                    self.handlers.entry(kind).or_default().push(handler.clone());
                    tracing::trace!(event = %kind, "subscribed cookie handler");
                }
                Err(e) => tracing::warn!(error = %e, "ignoring subscription"),
            }
        }
        self
    }

    /// Invoke every handler registered for `kind`, in registration order.
    ///
    /// Panics raised by handlers are not caught.
    pub fn dispatch(&self, kind: EventType, notification: &ChangeNotification) {
        // Clone the list so handlers may subscribe without holding the shard lock.
        let handlers = match self.handlers.get(&kind) {
            Some(entry) => entry.value().clone(),
            None => return,
        };

        let event = CookieEvent::new(kind, notification);
        tracing::debug!(event = %kind, handlers = handlers.len(), "dispatching cookie event");
        for handler in handlers {
            handler(&event);
        }
    }

    pub fn handler_count(&self, kind: EventType) -> usize {
        self.handlers.get(&kind).map_or(0, |entry| entry.len())
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts = f.debug_map();
        for kind in EventType::ALL {
            counts.entry(&kind, &self.handler_count(kind));
        }
        counts.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_subscribe_multiple_types() {
        let dispatcher = EventDispatcher::new();
        dispatcher.subscribe("insert  update\tchange", |_| {});
        assert_eq!(dispatcher.handler_count(EventType::Insert), 1);
        assert_eq!(dispatcher.handler_count(EventType::Update), 1);
        assert_eq!(dispatcher.handler_count(EventType::Change), 1);
        assert_eq!(dispatcher.handler_count(EventType::Delete), 0);
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        let dispatcher = EventDispatcher::new();
        dispatcher.subscribe("bogus clear", |_| {});
        assert_eq!(dispatcher.handler_count(EventType::Clear), 1);
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = EventDispatcher::new();

        let first = seen.clone();
        let second = seen.clone();
        dispatcher
            .subscribe("insert", move |e| first.lock().unwrap().push(("first", e.kind)))
            .subscribe("insert", move |e| second.lock().unwrap().push(("second", e.kind)));

        dispatcher.dispatch(EventType::Insert, &ChangeNotification::for_change("a", "1"));
        dispatcher.dispatch(EventType::Delete, &ChangeNotification::for_delete("a"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", EventType::Insert), ("second", EventType::Insert)]
        );
    }

    #[test]
    fn test_handler_may_subscribe_during_dispatch() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let inner = dispatcher.clone();
        dispatcher.subscribe("change", move |_| {
            inner.subscribe("change", |_| {});
        });

        dispatcher.dispatch(EventType::Change, &ChangeNotification::for_delete("a"));
        assert_eq!(dispatcher.handler_count(EventType::Change), 2);
    }
}
