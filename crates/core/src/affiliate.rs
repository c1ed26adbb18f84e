//! Affiliate metrics and Amazon tracking ID rules.

use crate::error::{validate_one_of, CoreError};
use crate::metrics::percentage;

// ---------------------------------------------------------------------------
// Tracking ID status
// ---------------------------------------------------------------------------

pub const TRACKING_STATUS_ACTIVE: &str = "active";
pub const TRACKING_STATUS_INACTIVE: &str = "inactive";
pub const TRACKING_STATUS_SUSPENDED: &str = "suspended";

pub const VALID_TRACKING_STATUSES: &[&str] = &[
    TRACKING_STATUS_ACTIVE,
    TRACKING_STATUS_INACTIVE,
    TRACKING_STATUS_SUSPENDED,
];

pub fn validate_tracking_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_TRACKING_STATUSES, "tracking status")
}

/// How many tracking IDs `best performing` returns per region.
pub const BEST_PERFORMING_LIMIT: i64 = 5;

/// Performance scores are on a 0-100 scale.
pub const MAX_PERFORMANCE_SCORE: i32 = 100;

pub fn validate_performance_score(score: i32) -> Result<(), CoreError> {
    if !(0..=MAX_PERFORMANCE_SCORE).contains(&score) {
        return Err(CoreError::Validation(format!(
            "performance_score must be between 0 and {MAX_PERFORMANCE_SCORE}, got {score}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Normalize a marketplace region code (`us` -> `US`).
///
/// Codes are 2-10 ASCII letters, matching the `VARCHAR(10)` column.
pub fn normalize_region(region: &str) -> Result<String, CoreError> {
    let code = region.trim();
    if !(2..=10).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::Validation(format!(
            "region must be 2-10 letters, got '{code}'"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Conversions per impression, as a percentage. Zero impressions yields 0.
pub fn conversion_rate(conversions: i64, impressions: i64) -> f64 {
    percentage(conversions as f64, impressions as f64)
}

/// Conversions per click, used for tracking IDs which only count clicks.
pub fn click_conversion_rate(conversions: i64, clicks: i64) -> f64 {
    percentage(conversions as f64, clicks as f64)
}

/// Reject negative counters on metric inputs.
pub fn validate_counters(counters: &[(&str, i64)]) -> Result<(), CoreError> {
    for (name, value) in counters {
        if *value < 0 {
            return Err(CoreError::Validation(format!(
                "{name} must not be negative, got {value}"
            )));
        }
    }
    Ok(())
}
