//! Immutable cookie snapshots and the store holding the live one.

use crate::cookies::codec;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock};

/// Point-in-time decoded view of all cookies, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: Map<String, Value>,
}

impl Snapshot {
    /// Decode a raw cookie header.
    pub fn parse(raw: &str) -> Self {
        codec::decode(raw)
    }

    pub(crate) fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// `None` means the cookie is absent; a stored `null` is `Some(&Value::Null)`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.entries.iter()
    }

    /// Owned `(name, value)` pairs in header order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.entries.clone()).to_string()
    }
}

/// Holds exactly one live [`Snapshot`].
///
/// Refreshing swaps in a new `Arc`; readers holding the previous one keep
/// a consistent view.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_header(raw: &str) -> Self {
        Self {
            current: RwLock::new(Arc::new(codec::decode(raw))),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.current().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.current().has(name)
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.current().entries()
    }

    /// Re-decode `raw` and make it the live snapshot.
    pub fn refresh(&self, raw: &str) {
        self.replace(Arc::new(codec::decode(raw)));
    }

    /// Install `snapshot` and hand back the one it replaced.
    pub fn replace(&self, snapshot: Arc<Snapshot>) -> Arc<Snapshot> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, snapshot)
    }
}
