use chrono::{DateTime, Utc};
use revdash_core::types::DbId;
use serde::Serialize;
use serde_json::{Map, Value};

/// A change dashboards may want to redraw for.
///
/// Serialized camelCase as the `event` field of a WebSocket `event` frame:
///
/// ```json
/// {"eventType": "alert.created", "workflowId": 3, "entityType": "alert",
///  "entityId": 42, "payload": {"severity": "high"}, "timestamp": "..."}
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEvent {
    /// One of the names in [`crate::kinds`].
    pub event_type: String,
    /// Socket subscriptions filter on this.
    pub workflow_id: Option<DbId>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// An event stamped now, with an empty object payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            workflow_id: None,
            entity_type: None,
            entity_id: None,
            payload: Value::Object(Map::new()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_workflow(self, workflow_id: DbId) -> Self {
        Self {
            workflow_id: Some(workflow_id),
            ..self
        }
    }

    pub fn with_entity(self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        Self {
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id),
            ..self
        }
    }

    pub fn with_payload(self, payload: Value) -> Self {
        Self { payload, ..self }
    }
}
