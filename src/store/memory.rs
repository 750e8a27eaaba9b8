use std::sync::Arc;

use dashmap::DashMap;

use super::{KeyValueStore, StoreError};

/// Thread-safe in-memory key-value store.
///
/// Cloning yields another handle onto the same map, which lets tests keep a
/// handle to inspect what the registry persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.get(key).map(|v| v.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
