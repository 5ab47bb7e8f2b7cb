use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::infrastructure::ports::{PersistenceStore, StoreError};

/// Volatile store. State is lost with the process.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, serde_json::Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}

impl PersistenceStore for InMemoryStore {
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::io(key, "store lock poisoned"))?;
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::io(key, "store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::io(key, "store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
