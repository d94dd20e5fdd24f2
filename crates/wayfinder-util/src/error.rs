//! Error types for wayfinder

use thiserror::Error;

/// Core error type for wayfinder operations
#[derive(Debug, Error)]
pub enum WayfinderError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl WayfinderError {
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}
