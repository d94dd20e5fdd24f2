//! Shared utilities for wayfinder
//!
//! This crate provides:
//! - ID types (ItemId, SessionId, ActionId)
//! - Time utilities (mockable wall clock, duration formatting)
//! - Error types
//! - Default paths for config, data, and runtime directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
