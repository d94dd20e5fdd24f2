//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    #[serde(default)]
    pub service: RawServiceConfig,

    #[serde(default)]
    pub analytics: RawAnalyticsConfig,

    #[serde(default)]
    pub recommendations: RawRecommendationConfig,

    #[serde(default)]
    pub quick_actions: RawQuickActionsConfig,

    #[serde(default)]
    pub access: RawAccessConfig,
}

/// Storage locations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Directory for durable storage
    pub data_dir: Option<PathBuf>,

    /// Directory for session-scoped storage
    pub runtime_dir: Option<PathBuf>,
}

/// Usage store and aggregation limits
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAnalyticsConfig {
    /// Maximum access history entries kept per item (0 = unbounded)
    pub max_history_per_item: Option<usize>,

    /// Size of the most-used ranking in snapshots
    pub most_used_limit: Option<usize>,

    /// Size of the least-used ranking in snapshots
    pub least_used_limit: Option<usize>,
}

/// Hide/promote thresholds
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRecommendationConfig {
    /// Items below `hide_ratio * average clicks` are suggested for hiding
    pub hide_ratio: Option<f64>,

    /// Items above `promote_ratio * average clicks` are suggested for promotion
    pub promote_ratio: Option<f64>,

    pub hide_confidence: Option<f64>,

    pub promote_confidence: Option<f64>,
}

/// Quick-actions palette settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawQuickActionsConfig {
    /// Number of recently executed actions remembered
    pub recent_limit: Option<usize>,

    /// Number of catalog actions listed for an empty query with no history
    pub default_listing: Option<usize>,
}

/// Static role used for permission checks
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAccessConfig {
    /// "admin", "editor", or "viewer"
    pub role: Option<String>,
}
