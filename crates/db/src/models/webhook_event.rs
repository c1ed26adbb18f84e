//! Inbound webhook event log.

use revdash_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `webhook_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebhookEvent {
    pub id: DbId,
    pub workflow_id: DbId,
    pub source: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub processed_at: Option<Timestamp>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
}

/// Insert parameters; built by the webhook receivers, not deserialized.
#[derive(Debug, Clone)]
pub struct NewWebhookEvent {
    pub workflow_id: DbId,
    pub source: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: &'static str,
}

/// Filters for listing webhook events.
#[derive(Debug, Clone, Default)]
pub struct WebhookEventFilter {
    pub status: Option<String>,
    pub source: Option<String>,
    pub workflow_id: Option<DbId>,
}
