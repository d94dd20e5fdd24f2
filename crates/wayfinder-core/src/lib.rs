//! Navigation analytics core for wayfinder
//!
//! This crate is the heart of wayfinder, containing:
//! - Usage store (click counts, access history, time on page)
//! - Session tracking (page changes, time credit)
//! - Analytics aggregation and hide/promote recommendations
//! - Permission-filtered quick actions with frequency ranking
//! - Sidebar customization and preference blobs
//!
//! Every service is an explicit object constructed over a
//! [`wayfinder_store::KeyValueStore`]; nothing is global.

mod aggregate;
mod engine;
mod events;
mod permissions;
mod preferences;
mod quick_actions;
mod recommend;
mod session;
mod sidebar;
mod usage;

#[cfg(test)]
mod test_support;

pub use aggregate::*;
pub use engine::*;
pub use events::*;
pub use permissions::*;
pub use preferences::*;
pub use quick_actions::*;
pub use recommend::*;
pub use session::*;
pub use sidebar::*;
pub use usage::*;
