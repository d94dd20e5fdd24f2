//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;
use wayfinder_api::Role;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("[{section}] {field} must be greater than zero")]
    NonPositive {
        section: &'static str,
        field: &'static str,
    },

    #[error("[{section}] {field} = {value} must be within [0, 1]")]
    OutOfUnitRange {
        section: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("[recommendations] hide_ratio ({hide}) must be below promote_ratio ({promote})")]
    RatioOrder { hide: f64, promote: f64 },

    #[error("[access] {0}")]
    InvalidRole(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let analytics = &config.analytics;
    for (field, value) in [
        ("most_used_limit", analytics.most_used_limit),
        ("least_used_limit", analytics.least_used_limit),
    ] {
        if value == Some(0) {
            errors.push(ValidationError::NonPositive {
                section: "analytics",
                field,
            });
        }
    }

    errors.extend(validate_recommendations(config));

    let quick = &config.quick_actions;
    for (field, value) in [
        ("recent_limit", quick.recent_limit),
        ("default_listing", quick.default_listing),
    ] {
        if value == Some(0) {
            errors.push(ValidationError::NonPositive {
                section: "quick_actions",
                field,
            });
        }
    }

    if let Some(role) = &config.access.role
        && let Err(e) = role.parse::<Role>()
    {
        errors.push(ValidationError::InvalidRole(e));
    }

    errors
}

fn validate_recommendations(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let rec = &config.recommendations;

    for (field, value) in [("hide_ratio", rec.hide_ratio), ("promote_ratio", rec.promote_ratio)] {
        if let Some(v) = value
            && !(v > 0.0 && v.is_finite())
        {
            errors.push(ValidationError::NonPositive {
                section: "recommendations",
                field,
            });
        }
    }

    for (field, value) in [
        ("hide_confidence", rec.hide_confidence),
        ("promote_confidence", rec.promote_confidence),
    ] {
        if let Some(v) = value
            && !(0.0..=1.0).contains(&v)
        {
            errors.push(ValidationError::OutOfUnitRange {
                section: "recommendations",
                field,
                value: v,
            });
        }
    }

    let hide = rec.hide_ratio.unwrap_or(crate::DEFAULT_HIDE_RATIO);
    let promote = rec.promote_ratio.unwrap_or(crate::DEFAULT_PROMOTE_RATIO);
    if hide >= promote {
        errors.push(ValidationError::RatioOrder { hide, promote });
    }

    errors
}
