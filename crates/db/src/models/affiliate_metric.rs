//! Affiliate program metrics and their aggregates.

use revdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `affiliate_metrics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AffiliateMetric {
    pub id: DbId,
    pub workflow_id: DbId,
    pub tracking_id: String,
    pub region: String,
    pub clicks: i32,
    pub impressions: i32,
    pub conversions: i32,
    pub revenue: f64,
    pub commission: f64,
    pub conversion_rate: f64,
    pub performance_score: i32,
    pub date: Timestamp,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for recording affiliate metrics. `conversion_rate` is derived.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAffiliateMetric {
    pub workflow_id: DbId,
    pub tracking_id: String,
    pub region: String,
    #[serde(default)]
    pub clicks: i32,
    #[serde(default)]
    pub impressions: i32,
    #[serde(default)]
    pub conversions: i32,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub performance_score: i32,
    pub date: Option<Timestamp>,
    pub metadata: Option<serde_json::Value>,
}

/// Revenue and conversions summed per (tracking ID, region).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopPerformer {
    pub tracking_id: String,
    pub region: String,
    pub total_revenue: f64,
    pub total_conversions: i64,
    pub avg_conversion_rate: f64,
}

/// Counter totals over a set of affiliate metric rows.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct AffiliateTotals {
    pub clicks: i64,
    pub impressions: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub commission: f64,
}

/// [`AffiliateTotals`] for a single region.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegionTotals {
    pub region: String,
    pub clicks: i64,
    pub impressions: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub commission: f64,
}
