//! Real-time workflow metrics (execution time, memory, ...).

use revdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `real_time_metrics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RealTimeMetric {
    pub id: DbId,
    pub workflow_id: DbId,
    pub metric_type: String,
    pub value: f64,
    pub unit: Option<String>,
    pub timestamp: Timestamp,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRealTimeMetric {
    pub workflow_id: DbId,
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub metadata: Option<serde_json::Value>,
}
