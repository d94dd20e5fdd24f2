//! Versioned blob persistence
//!
//! Every value is written as `{"version": N, "data": ...}`. Reading goes
//! through [`decode_blob`], which yields a [`LoadOutcome`] instead of an
//! error so that one damaged key never prevents the others from loading.
//! A store that cannot be read at all is reported as
//! [`LoadOutcome::Unavailable`], which owners must not overwrite.
//!
//! Payloads written before envelopes existed (a bare JSON value) are
//! accepted as version 0 when they still match the current shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use wayfinder_api::{StorageKey, SCHEMA_VERSION};

use crate::{KeyValueStore, StoreResult};

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Result of reading a persisted blob
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// Parsed successfully (possibly after migrating a legacy payload)
    Loaded(T),
    /// No value stored under the key
    Missing,
    /// Value present but unusable
    Corrupt { reason: String },
    /// The store itself could not be read; the stored value may be intact
    Unavailable { reason: String },
}

/// Decode a raw stored string
pub fn decode_blob<T: DeserializeOwned>(raw: &str) -> LoadOutcome<T> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            return LoadOutcome::Corrupt {
                reason: format!("invalid JSON: {}", e),
            };
        }
    };

    if is_envelope(&value) {
        let envelope: Envelope = match serde_json::from_value(value) {
            Ok(env) => env,
            Err(e) => {
                return LoadOutcome::Corrupt {
                    reason: format!("invalid envelope: {}", e),
                };
            }
        };

        if envelope.version > SCHEMA_VERSION {
            return LoadOutcome::Corrupt {
                reason: format!(
                    "unsupported schema version {} (expected <= {})",
                    envelope.version, SCHEMA_VERSION
                ),
            };
        }

        return match serde_json::from_value(envelope.data) {
            Ok(data) => LoadOutcome::Loaded(data),
            Err(e) => LoadOutcome::Corrupt {
                reason: format!("schema mismatch: {}", e),
            },
        };
    }

    // Legacy, unversioned payload
    match serde_json::from_value(value) {
        Ok(data) => {
            debug!("Migrated unversioned blob");
            LoadOutcome::Loaded(data)
        }
        Err(e) => LoadOutcome::Corrupt {
            reason: format!("schema mismatch: {}", e),
        },
    }
}

fn is_envelope(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => {
            map.len() == 2
                && map.get("version").is_some_and(Value::is_u64)
                && map.contains_key("data")
        }
        None => false,
    }
}

/// Encode a value in the current envelope
pub fn encode_blob<T: Serialize>(value: &T) -> StoreResult<String> {
    let envelope = EnvelopeRef {
        version: SCHEMA_VERSION,
        data: value,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Read and decode the blob stored under `key`
pub fn load_blob<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StorageKey,
) -> LoadOutcome<T> {
    match store.get(key.as_str()) {
        Ok(Some(raw)) => decode_blob(&raw),
        Ok(None) => LoadOutcome::Missing,
        Err(e) => LoadOutcome::Unavailable {
            reason: e.to_string(),
        },
    }
}

/// Load the blob under `key`, falling back to `T::default()` when it is
/// missing or corrupt. Corruption is logged, never surfaced.
///
/// Returns `None` when the store could not be read.
fn read_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: StorageKey,
) -> Option<T> {
    match load_blob(store, key) {
        LoadOutcome::Loaded(value) => Some(value),
        LoadOutcome::Missing => {
            debug!(key = %key, "No stored value, using defaults");
            Some(T::default())
        }
        LoadOutcome::Corrupt { reason } => {
            warn!(key = %key, reason = %reason, "Discarding corrupt stored value");
            Some(T::default())
        }
        LoadOutcome::Unavailable { reason } => {
            warn!(key = %key, reason = %reason, "Store unreadable, writes withheld");
            None
        }
    }
}

/// Encode and write `value` under `key`
pub fn save_blob<T: Serialize>(
    store: &dyn KeyValueStore,
    key: StorageKey,
    value: &T,
) -> StoreResult<()> {
    let raw = encode_blob(value)?;
    store.set(key.as_str(), &raw)
}

/// Write `value` under `key`, logging instead of failing.
///
/// Returns whether the write succeeded.
pub fn save_blob_logged<T: Serialize>(
    store: &dyn KeyValueStore,
    key: StorageKey,
    value: &T,
) -> bool {
    match save_blob(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to persist value");
            false
        }
    }
}

/// In-memory copy of one stored blob.
///
/// When the first read fails the copy starts from defaults and is marked
/// unsynced. Every update re-reads the store first; until a read succeeds
/// changes stay in memory, so an unreadable value is never overwritten.
#[derive(Debug)]
pub struct PersistedBlob<T> {
    key: StorageKey,
    value: T,
    synced: bool,
}

impl<T: Serialize + DeserializeOwned + Default> PersistedBlob<T> {
    pub fn load(store: &dyn KeyValueStore, key: StorageKey) -> Self {
        match read_or_default(store, key) {
            Some(value) => Self {
                key,
                value,
                synced: true,
            },
            None => Self {
                key,
                value: T::default(),
                synced: false,
            },
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Whether the in-memory copy reflects what is stored
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Apply `f` and write the result. Returns whether it was written.
    pub fn update(&mut self, store: &dyn KeyValueStore, f: impl FnOnce(&mut T)) -> bool {
        if !self.synced
            && let Some(value) = read_or_default(store, self.key)
        {
            debug!(key = %self.key, "Store readable again");
            self.value = value;
            self.synced = true;
        }

        f(&mut self.value);

        if !self.synced {
            warn!(key = %self.key, "Store still unreadable, change kept in memory");
            return false;
        }
        save_blob_logged(store, self.key, &self.value)
    }
}
