//! Store trait definitions

use crate::StoreResult;

/// String-keyed, string-valued storage.
///
/// Writes are synchronous: once `set` returns, a subsequent `get` on the
/// same store observes the value.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key` (no-op when absent)
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// All keys currently present, sorted
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
