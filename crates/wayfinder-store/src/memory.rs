//! In-memory store, lives as long as the process

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{KeyValueStore, StoreError, StoreResult};

/// Volatile key/value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.keys().cloned().collect())
    }

    fn is_healthy(&self) -> bool {
        self.values.lock().is_ok()
    }
}
