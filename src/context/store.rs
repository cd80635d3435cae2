//! Context store: last-write-wins string map shared by every interpreter.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One context pair, as sent to the backend alongside a callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    pub value: String,
}

/// Context store interface
pub trait ContextStore: Send + Sync {
    fn retrieve_context_value(&self, key: &str) -> Option<String>;
    fn add_context(&self, key: &str, value: &str);

    /// Snapshot of every pair, ordered by key
    fn entries(&self) -> Vec<ContextEntry>;
}

/// Process-wide in-memory context store
#[derive(Debug, Default)]
pub struct InMemoryContextStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl ContextStore for InMemoryContextStore {
    fn retrieve_context_value(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn add_context(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    fn entries(&self) -> Vec<ContextEntry> {
        self.values
            .read()
            .iter()
            .map(|(key, value)| ContextEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }
}
