//! Outbound API call records made by workflows.

use revdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `api_usage` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiUsage {
    pub id: DbId,
    pub workflow_id: DbId,
    pub endpoint: String,
    pub method: String,
    pub status_code: Option<i32>,
    /// Milliseconds.
    pub response_time: Option<i32>,
    pub request_size: Option<i32>,
    pub response_size: Option<i32>,
    pub success: bool,
    pub error_message: Option<String>,
    pub timestamp: Timestamp,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiUsage {
    pub workflow_id: DbId,
    pub endpoint: String,
    pub method: String,
    pub status_code: Option<i32>,
    pub response_time: Option<i32>,
    pub request_size: Option<i32>,
    pub response_size: Option<i32>,
    #[serde(default)]
    pub success: bool,
    pub error_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Raw counts behind the API usage summary card.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ApiUsageTotals {
    pub total_calls: i64,
    pub success_calls: i64,
    pub avg_response_time: f64,
}

/// API usage summary card.
#[derive(Debug, Clone, Serialize)]
pub struct ApiUsageSummary {
    pub total_calls: i64,
    pub success_calls: i64,
    pub avg_response_time: f64,
    pub success_rate: f64,
}

/// Per (endpoint, method) call breakdown.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EndpointUsage {
    pub endpoint: String,
    pub method: String,
    pub calls: i64,
    pub avg_response_time: f64,
    pub success_rate: f64,
    pub errors: i64,
}
