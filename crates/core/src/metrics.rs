//! Rates, revenue summaries, and well-known real-time metric names.
//!
//! The dashboard renders these numbers directly, so every percentage and
//! money figure is rounded to two decimals here rather than in the client.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Real-time metric names and units
// ---------------------------------------------------------------------------

/// Execution time reported by n8n (milliseconds).
pub const METRIC_EXECUTION_TIME: &str = "execution_time";

/// Scenario duration reported by Make (seconds).
pub const METRIC_EXECUTION_DURATION: &str = "execution_duration";

pub const UNIT_MILLISECONDS: &str = "milliseconds";
pub const UNIT_SECONDS: &str = "seconds";

// ---------------------------------------------------------------------------
// Rounding and rates
// ---------------------------------------------------------------------------

/// Round to two decimal places (cents / hundredths of a percent).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage rounded to two decimals; 0 when `whole` is 0.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        round2(part / whole * 100.0)
    }
}

/// Success rate of `success` calls out of `total`, as a percentage.
pub fn success_rate(success: i64, total: i64) -> f64 {
    percentage(success as f64, total as f64)
}

// ---------------------------------------------------------------------------
// Revenue series
// ---------------------------------------------------------------------------

/// One day of completed revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    /// UTC calendar day (`YYYY-MM-DD`).
    pub date: chrono::NaiveDate,
    pub revenue: f64,
    /// Number of completed transactions that day.
    pub transactions: i64,
    /// Number of distinct workflows that earned revenue that day.
    pub workflows: i64,
}

/// Headline figures shown under the revenue chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total: f64,
    pub average_daily: f64,
    pub peak: f64,
}

impl RevenueSummary {
    /// Summarise a series. Empty input yields all zeros.
    pub fn from_points(points: &[RevenuePoint]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let total: f64 = points.iter().map(|p| p.revenue).sum();
        let peak = points.iter().map(|p| p.revenue).fold(0.0_f64, f64::max);
        Self {
            total: round2(total),
            average_daily: round2(total / points.len() as f64),
            peak: round2(peak),
        }
    }
}
