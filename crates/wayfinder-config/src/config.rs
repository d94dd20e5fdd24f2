//! Validated configuration structures

use crate::schema::RawConfig;
use std::path::PathBuf;
use wayfinder_api::Role;

/// Validated configuration ready for use by the core
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub service: ServiceConfig,
    pub analytics: AnalyticsConfig,
    pub recommendations: RecommendationConfig,
    pub quick_actions: QuickActionsConfig,
    pub role: Role,
}

impl Config {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let analytics = AnalyticsConfig {
            max_history_per_item: match raw.analytics.max_history_per_item {
                Some(0) => None,
                Some(n) => Some(n),
                None => Some(crate::DEFAULT_MAX_HISTORY_PER_ITEM),
            },
            most_used_limit: raw
                .analytics
                .most_used_limit
                .unwrap_or(crate::DEFAULT_MOST_USED_LIMIT),
            least_used_limit: raw
                .analytics
                .least_used_limit
                .unwrap_or(crate::DEFAULT_LEAST_USED_LIMIT),
        };

        let defaults = RecommendationConfig::default();
        let recommendations = RecommendationConfig {
            hide_ratio: raw.recommendations.hide_ratio.unwrap_or(defaults.hide_ratio),
            promote_ratio: raw
                .recommendations
                .promote_ratio
                .unwrap_or(defaults.promote_ratio),
            hide_confidence: raw
                .recommendations
                .hide_confidence
                .unwrap_or(defaults.hide_confidence),
            promote_confidence: raw
                .recommendations
                .promote_confidence
                .unwrap_or(defaults.promote_confidence),
        };

        let quick_actions = QuickActionsConfig {
            recent_limit: raw
                .quick_actions
                .recent_limit
                .unwrap_or(crate::DEFAULT_RECENT_LIMIT),
            default_listing: raw
                .quick_actions
                .default_listing
                .unwrap_or(crate::DEFAULT_LISTING),
        };

        // Validation already rejected unknown roles
        let role = raw
            .access
            .role
            .and_then(|r| r.parse().ok())
            .unwrap_or_default();

        Self {
            service: ServiceConfig {
                data_dir: raw.service.data_dir,
                runtime_dir: raw.service.runtime_dir,
            },
            analytics,
            recommendations,
            quick_actions,
            role,
        }
    }
}

/// Storage locations. None means "use the platform default".
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub data_dir: Option<PathBuf>,
    pub runtime_dir: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(wayfinder_util::default_data_dir)
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.runtime_dir
            .clone()
            .unwrap_or_else(wayfinder_util::default_runtime_dir)
    }
}

/// Usage store and aggregation limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Cap on `access_history` per item. None means unbounded.
    pub max_history_per_item: Option<usize>,
    pub most_used_limit: usize,
    pub least_used_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_history_per_item: Some(crate::DEFAULT_MAX_HISTORY_PER_ITEM),
            most_used_limit: crate::DEFAULT_MOST_USED_LIMIT,
            least_used_limit: crate::DEFAULT_LEAST_USED_LIMIT,
        }
    }
}

/// Hide/promote thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationConfig {
    pub hide_ratio: f64,
    pub promote_ratio: f64,
    pub hide_confidence: f64,
    pub promote_confidence: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            hide_ratio: crate::DEFAULT_HIDE_RATIO,
            promote_ratio: crate::DEFAULT_PROMOTE_RATIO,
            hide_confidence: 0.8,
            promote_confidence: 0.9,
        }
    }
}

/// Quick-actions palette settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickActionsConfig {
    pub recent_limit: usize,
    pub default_listing: usize,
}

impl Default for QuickActionsConfig {
    fn default() -> Self {
        Self {
            recent_limit: crate::DEFAULT_RECENT_LIMIT,
            default_listing: crate::DEFAULT_LISTING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_empty_file() {
        let raw: RawConfig = toml::from_str("config_version = 1").unwrap();
        let config = Config::from_raw(raw);

        assert_eq!(config.analytics, AnalyticsConfig::default());
        assert_eq!(config.recommendations, RecommendationConfig::default());
        assert_eq!(config.quick_actions, QuickActionsConfig::default());
        assert_eq!(config.role, Role::Editor);
    }

    #[test]
    fn zero_history_means_unbounded() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1
            [analytics]
            max_history_per_item = 0
            "#,
        )
        .unwrap();
        let config = Config::from_raw(raw);
        assert_eq!(config.analytics.max_history_per_item, None);
    }

    #[test]
    fn explicit_dirs_win() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1
            [service]
            data_dir = "/srv/wayfinder"
            "#,
        )
        .unwrap();
        let config = Config::from_raw(raw);
        assert_eq!(config.service.data_dir(), PathBuf::from("/srv/wayfinder"));
    }
}
