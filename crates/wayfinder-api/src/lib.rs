//! Data model shared by the wayfinder crates
//!
//! This crate defines the serializable shapes that cross crate and storage
//! boundaries:
//! - Usage records and session records
//! - Derived analytics snapshots and recommendations
//! - Sidebar layout and preference blobs
//! - Static roles for permission checks
//! - Storage keys and the persisted schema version

mod access;
mod keys;
mod settings;
mod types;

pub use access::*;
pub use keys::*;
pub use settings::*;
pub use types::*;

/// Current version of every persisted blob envelope
pub const SCHEMA_VERSION: u32 = 1;
