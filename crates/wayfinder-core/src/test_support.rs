//! Store doubles shared by the unit tests

use std::sync::atomic::{AtomicBool, Ordering};
use wayfinder_store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

/// Memory store whose reads fail while failing is set
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database("database is locked".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.inner.keys()
    }

    fn is_healthy(&self) -> bool {
        !self.failing.load(Ordering::SeqCst)
    }
}
