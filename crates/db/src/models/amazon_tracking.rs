//! Amazon affiliate tracking IDs.

use revdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `amazon_tracking_ids` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AmazonTrackingId {
    pub id: DbId,
    pub tracking_id: String,
    pub region: String,
    pub status: String,
    pub performance_score: i32,
    pub total_clicks: i32,
    pub total_conversions: i32,
    pub total_revenue: f64,
    pub avg_conversion_rate: f64,
    pub last_used: Option<Timestamp>,
    pub usage_count: i32,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAmazonTrackingId {
    pub tracking_id: String,
    pub region: String,
    pub status: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Body of `PUT /amazon-tracking/{id}/performance`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTrackingPerformance {
    pub performance_score: i32,
    pub total_clicks: Option<i32>,
    pub total_conversions: Option<i32>,
    pub total_revenue: Option<f64>,
    pub usage_count: Option<i32>,
}
