//! Transaction entity model and DTOs.

use revdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub workflow_id: DbId,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub source: Option<String>,
    pub source_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a transaction.
///
/// The status is chosen by the caller: `pending` from the API, `completed`
/// for settled Stripe payments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransaction {
    pub workflow_id: DbId,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub source: String,
    pub source_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Body of `PUT /transactions/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTransactionStatus {
    pub status: String,
}

/// Completed revenue for one UTC day, as returned by the grouping query.
#[derive(Debug, Clone, FromRow)]
pub struct DailyRevenueRow {
    pub day: chrono::NaiveDate,
    pub revenue: f64,
    pub transactions: i64,
    pub workflows: i64,
}

/// Transaction counts per type.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct TransactionCounts {
    pub total: i64,
    pub revenue: i64,
    pub expense: i64,
    pub commission: i64,
    pub refund: i64,
}
