//! Persistence layer for wayfinder
//!
//! Provides:
//! - A key/value store trait standing in for browser local/session storage
//! - SQLite-backed and in-memory implementations
//! - Versioned blob envelopes with a tagged load outcome

mod blob;
mod memory;
mod sqlite;
mod traits;

pub use blob::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
