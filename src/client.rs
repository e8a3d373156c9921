//! Cookie client with builder pattern.
//!
//! The [`CookieClient`] owns the live snapshot, the subscriber registry and
//! a handle to the cookie host. Construct one per application and share it.
//!
//! # Example
//!
//! ```rust,ignore
//! use cookie_events::{CookieClient, cookies::{CookieAttributes, CookieMonster}};
//! use std::sync::Arc;
//!
//! let (jar, changes) = CookieMonster::with_change_stream();
//! let client = Arc::new(CookieClient::new(Arc::new(jar)));
//!
//! client
//!     .on("insert update", |e| println!("{} {:?}", e.kind, e.changed))
//!     .on("clear", |_| println!("all gone"));
//!
//! tokio::spawn({
//!     let client = client.clone();
//!     async move { client.watch(changes).await }
//! });
//!
//! client.set_cookie("theme", "dark", &CookieAttributes::new().expires(3600));
//! ```

use crate::base::context::IoResultExt;
use crate::base::cookieerror::CookieError;
use crate::cookies::canonicalcookie::{CookieAttributes, Expiry};
use crate::cookies::codec;
use crate::cookies::host::CookieHost;
use crate::cookies::snapshot::{Snapshot, SnapshotStore};
use crate::cookies::utc::{DateOrder, DateResolver};
use crate::events::{ChangeClassifier, ChangeNotification, CookieEvent, EventDispatcher, EventType};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tokio::sync::mpsc;

/// Expiry written by [`CookieClient::remove_cookie`].
pub const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

static QUERY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";\s").expect("separator pattern is valid"));

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// How `A/B/YYYY` prefixes are read by [`CookieClient::utc`].
    pub date_order: DateOrder,
    /// Path written when a cookie write does not name one.
    pub default_path: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            default_path: codec::DEFAULT_PATH.to_string(),
        }
    }
}

/// Builder for creating a [`CookieClient`].
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct CookieClientBuilder {
    options: ClientOptions,
}

impl CookieClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how ambiguous `A/B/YYYY` dates are read.
    pub fn date_order(mut self, order: DateOrder) -> Self {
        self.options.date_order = order;
        self
    }

    /// Set the path used when a write does not name one.
    pub fn default_path(mut self, path: impl Into<String>) -> Self {
        self.options.default_path = path.into();
        self
    }

    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the client and take the initial snapshot from `host`.
    pub fn build(self, host: Arc<dyn CookieHost>) -> CookieClient {
        let store = SnapshotStore::from_header(&host.cookie_header());
        tracing::debug!(cookies = store.current().len(), "cookie client initialized");
        CookieClient {
            host,
            store,
            dispatcher: EventDispatcher::new(),
            classifier: ChangeClassifier::new(),
            resolver: DateResolver::new(self.options.date_order),
            options: self.options,
        }
    }
}

/// Structured access to the host's cookies plus change events.
pub struct CookieClient {
    host: Arc<dyn CookieHost>,
    store: SnapshotStore,
    dispatcher: EventDispatcher,
    classifier: ChangeClassifier,
    resolver: DateResolver,
    options: ClientOptions,
}

impl CookieClient {
    /// Create a client with default options.
    pub fn new(host: Arc<dyn CookieHost>) -> Self {
        Self::builder().build(host)
    }

    pub fn builder() -> CookieClientBuilder {
        CookieClientBuilder::default()
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Write a cookie. `value` is percent-encoded as is.
    pub fn set_cookie(&self, name: &str, value: &str, attrs: &CookieAttributes) {
        let setter =
            codec::encode_with_default_path(name, value, attrs, &self.options.default_path);
        tracing::debug!(name = %name, "writing cookie");
        self.host.set_cookie_header(&setter);
    }

    /// Serialize `value` as JSON and write it, so it reads back structured.
    pub fn set_json<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
        attrs: &CookieAttributes,
    ) -> Result<(), CookieError> {
        let json = serde_json::to_string(value)?;
        self.set_cookie(name, &json, attrs);
        Ok(())
    }

    /// Like [`set_cookie`](Self::set_cookie), but only for a cookie present in
    /// the current snapshot.
    pub fn update_cookie(
        &self,
        name: &str,
        value: &str,
        attrs: &CookieAttributes,
    ) -> Result<(), CookieError> {
        if !self.store.has(name) {
            tracing::debug!(name = %name, "update rejected, cookie not found");
            return Err(CookieError::not_found(name));
        }
        self.set_cookie(name, value, attrs);
        Ok(())
    }

    /// Delete a cookie by writing an already expired one.
    ///
    /// Without `path`, targets the same default path that writes use.
    pub fn remove_cookie(&self, name: &str, path: Option<&str>, domain: Option<&str>) {
        let attrs = CookieAttributes {
            expires: Some(Expiry::Expires(EPOCH_EXPIRES.to_string())),
            path: path.map(str::to_string),
            domain: domain.map(str::to_string),
            ..CookieAttributes::default()
        };
        let setter =
            codec::encode_with_default_path(name, "", &attrs, &self.options.default_path);
        tracing::debug!(name = %name, "removing cookie");
        self.host.set_cookie_header(&setter);
    }

    /// Remove every cookie the host enumerates, one at a time.
    ///
    /// Fails without rollback if the enumeration fails.
    pub async fn clear_all(&self) -> Result<(), CookieError> {
        let records = self.host.get_all().await.enumeration_context()?;
        tracing::debug!(count = records.len(), "clearing all cookies");
        for record in records {
            self.remove_cookie(&record.name, record.path.as_deref(), record.domain.as_deref());
        }
        Ok(())
    }

    /// `None` if absent; a stored JSON `null` is `Some(Value::Null)`.
    pub fn get_cookie(&self, name: &str) -> Option<Value> {
        self.store.get(name)
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.store.has(name)
    }

    pub fn list_cookies(&self) -> Vec<(String, Value)> {
        self.store.entries()
    }

    /// The raw header as a query string: `a=1; b=2` becomes `a=1&b=2`.
    pub fn to_query_string(&self) -> String {
        QUERY_SEPARATOR
            .replace_all(&self.host.cookie_header(), "&")
            .into_owned()
    }

    /// JSON object of the cookies currently in the host header.
    pub fn to_json(&self) -> String {
        Snapshot::parse(&self.host.cookie_header()).to_json()
    }

    /// Resolve a loose date/time into a GMT date string for `expires`.
    pub fn utc(&self, input: &str) -> String {
        self.resolver.resolve(input)
    }

    /// Subscribe `handler` to whitespace-separated event types
    /// (`insert update delete clear change`).
    pub fn on<F>(&self, types: &str, handler: F) -> &Self
    where
        F: Fn(&CookieEvent) + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(types, handler);
        self
    }

    /// The live snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// Re-read the host header into the live snapshot.
    pub fn refresh(&self) {
        self.store.refresh(&self.host.cookie_header());
    }

    /// Classify one notification, fire its events and refresh the snapshot.
    ///
    /// The new state is the header carried by the notification, or the
    /// host's current header when the notification has none.
    ///
    /// Fires at most one of `insert`/`update`/`delete`/`clear`, then `change`.
    pub fn handle_change(&self, notification: &ChangeNotification) {
        let prior = self.store.current();
        let header = match &notification.header {
            Some(header) => header.clone(),
            None => self.host.cookie_header(),
        };
        let classification = self.classifier.classify(&prior, notification, &header);

        tracing::debug!(
            kind = ?classification.kind,
            changed = notification.changed.len(),
            deleted = notification.deleted.len(),
            "classified cookie change"
        );

        if let Some(kind) = classification.kind {
            self.dispatcher.dispatch(kind, notification);
        }
        self.dispatcher.dispatch(EventType::Change, notification);

        self.store.replace(classification.snapshot);
    }

    /// Drain a change stream until its sender side is dropped.
    pub async fn watch(&self, mut changes: mpsc::UnboundedReceiver<ChangeNotification>) {
        while let Some(notification) = changes.recv().await {
            self.handle_change(&notification);
        }
        tracing::debug!("cookie change stream closed");
    }
}

impl std::fmt::Debug for CookieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieClient")
            .field("snapshot", &self.store.current())
            .field("dispatcher", &self.dispatcher)
            .field("options", &self.options)
            .finish()
    }
}
