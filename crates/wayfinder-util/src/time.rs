//! Time utilities for wayfinder
//!
//! Every timestamp recorded by the analytics core comes from [`now`], which
//! wraps the local wall clock.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `WAYFINDER_MOCK_TIME` environment variable can be set
//! to override the system time. Useful for exercising the daily and weekly
//! histograms around year boundaries.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-31 23:59:00`)

use chrono::{DateTime, Local, TimeZone};
#[cfg(debug_assertions)]
use chrono::NaiveDateTime;
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "WAYFINDER_MOCK_TIME";

/// Format accepted by `WAYFINDER_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once per process so
/// mock time advances naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT) {
                    Ok(naive_dt) => match Local.from_local_datetime(&naive_dt).single() {
                        Some(mock_dt) => {
                            let offset = mock_dt.signed_duration_since(Local::now());
                            tracing::info!(
                                mock_time = %mock_time_str,
                                offset_secs = offset.num_seconds(),
                                "Mock time enabled"
                            );
                            return Some(offset);
                        }
                        None => {
                            tracing::warn!(
                                mock_time = %mock_time_str,
                                "Failed to convert mock time to local timezone"
                            );
                        }
                    },
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = MOCK_TIME_FORMAT,
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Milliseconds elapsed from `earlier` to `later`, clamped at zero when the
/// clock went backwards.
pub fn elapsed_ms(earlier: DateTime<Local>, later: DateTime<Local>) -> u64 {
    later
        .signed_duration_since(earlier)
        .num_milliseconds()
        .max(0) as u64
}

/// Format a DateTime with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Helper to format durations in human-readable form
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m 1s");
    }

    #[test]
    fn test_format_datetime_full() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_datetime_full(&dt), "2025-12-25 14:30:45");
    }

    #[test]
    fn test_elapsed_ms() {
        let start = Local.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let end = start + chrono::Duration::milliseconds(1500);
        assert_eq!(elapsed_ms(start, end), 1500);

        // Clock skew backwards never yields negative time
        assert_eq!(elapsed_ms(end, start), 0);
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_parse_mock_time_format() {
        for s in ["2025-12-31 23:59:00", "2026-01-01 00:00:00"] {
            assert!(chrono::NaiveDateTime::parse_from_str(s, MOCK_TIME_FORMAT).is_ok());
        }
        for s in ["2025-12-31", "2025-12-31T23:59:00", "not a date", ""] {
            assert!(chrono::NaiveDateTime::parse_from_str(s, MOCK_TIME_FORMAT).is_err());
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_is_mock_time_active_does_not_panic() {
        let _ = is_mock_time_active();
    }
}
