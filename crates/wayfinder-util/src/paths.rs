//! Default paths for wayfinder components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/wayfinder/config.toml` or `~/.config/wayfinder/config.toml`
//! - Data (durable storage): `$XDG_DATA_HOME/wayfinder` or `~/.local/share/wayfinder`
//! - Runtime (session storage): `$XDG_RUNTIME_DIR/wayfinder` or `/tmp/wayfinder-$USER`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const WAYFINDER_DATA_DIR_ENV: &str = "WAYFINDER_DATA_DIR";

/// Environment variable for overriding the config file path
pub const WAYFINDER_CONFIG_ENV: &str = "WAYFINDER_CONFIG";

/// Application subdirectory name
const APP_DIR: &str = "wayfinder";

/// Durable storage database filename
pub const DURABLE_DB_FILENAME: &str = "wayfinder.db";

/// Session storage database filename
pub const SESSION_DB_FILENAME: &str = "session.db";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/wayfinder/config.toml`
/// 2. `~/.config/wayfinder/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join("config.toml");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml");
    }

    PathBuf::from("/etc").join(APP_DIR).join("config.toml")
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$WAYFINDER_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/wayfinder` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/wayfinder` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(WAYFINDER_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking WAYFINDER_DATA_DIR.
/// Used for config defaults where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the runtime directory holding session-scoped storage.
///
/// `$XDG_RUNTIME_DIR` is cleared at logout, which gives session storage
/// its lifetime.
pub fn default_runtime_dir() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join(APP_DIR);
    }

    let username = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    PathBuf::from(format!("/tmp/{}-{}", APP_DIR, username))
}
