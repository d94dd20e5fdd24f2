//! Config validation CLI tool
//!
//! Validates a wayfinder configuration file and reports any errors.

use std::path::PathBuf;
use std::process::ExitCode;
use wayfinder_util::default_config_path;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a wayfinder configuration file.");
            eprintln!();
            eprintln!("Default location: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match wayfinder_config::load_config(&config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", wayfinder_config::CURRENT_CONFIG_VERSION);
            println!("  Role: {}", config.role);
            match config.analytics.max_history_per_item {
                Some(cap) => println!("  History cap per item: {}", cap),
                None => println!("  History cap per item: unbounded"),
            }
            println!(
                "  Rankings: top {} / bottom {}",
                config.analytics.most_used_limit, config.analytics.least_used_limit
            );
            println!(
                "  Hide below {:.0}% of average (confidence {:.2})",
                config.recommendations.hide_ratio * 100.0,
                config.recommendations.hide_confidence
            );
            println!(
                "  Promote above {:.1}x average (confidence {:.2})",
                config.recommendations.promote_ratio, config.recommendations.promote_confidence
            );
            println!(
                "  Quick actions: {} recent, {} listed by default",
                config.quick_actions.recent_limit, config.quick_actions.default_listing
            );

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                wayfinder_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                wayfinder_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                wayfinder_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                wayfinder_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        wayfinder_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
