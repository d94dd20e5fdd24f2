//! Configuration parsing and validation for wayfinder
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Analytics limits and history cap
//! - Recommendation thresholds
//! - Quick-action palette sizes and the static access role
//! - Validation with clear error messages
//!
//! Every section is optional; a missing config file yields the defaults.

mod config;
mod schema;
mod validation;

pub use config::*;
pub use schema::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

pub const DEFAULT_MAX_HISTORY_PER_ITEM: usize = 1000;
pub const DEFAULT_MOST_USED_LIMIT: usize = 10;
pub const DEFAULT_LEAST_USED_LIMIT: usize = 5;
pub const DEFAULT_HIDE_RATIO: f64 = 0.1;
pub const DEFAULT_PROMOTE_RATIO: f64 = 2.0;
pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_LISTING: usize = 8;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load configuration if the file exists, otherwise use defaults
pub fn load_config_or_default(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let config = load_config(path)?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Ok(Config::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_api::Role;

    #[test]
    fn parse_minimal_config() {
        let config = parse_config("config_version = 1").unwrap();
        assert_eq!(config.analytics.most_used_limit, DEFAULT_MOST_USED_LIMIT);
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
            config_version = 1

            [analytics]
            max_history_per_item = 50

            [recommendations]
            hide_ratio = 0.2
            promote_ratio = 3.0

            [access]
            role = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.analytics.max_history_per_item, Some(50));
        assert_eq!(config.recommendations.hide_ratio, 0.2);
        assert_eq!(config.recommendations.promote_ratio, 3.0);
        assert_eq!(config.role, Role::Admin);
    }

    #[test]
    fn reject_wrong_version() {
        let result = parse_config("config_version = 99");
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_values() {
        let result = parse_config(
            r#"
            config_version = 1
            [quick_actions]
            default_listing = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.quick_actions.recent_limit, DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "config_version = 1\n[access]\nrole = \"viewer\"\n").unwrap();

        let config = load_config_or_default(&path).unwrap();
        assert_eq!(config.role, Role::Viewer);
    }
}
