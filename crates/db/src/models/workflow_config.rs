//! Per-workflow key/value configuration entries.

use revdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workflow_config` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowConfigEntry {
    pub id: DbId,
    pub workflow_id: DbId,
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub is_encrypted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `PUT /workflows/{id}/config/{key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertWorkflowConfig {
    pub value: serde_json::Value,
    pub description: Option<String>,
    #[serde(default)]
    pub is_encrypted: bool,
}
