//! Receiver for any other webhook source.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::error::CoreError;
use revdash_core::types::DbId;
use revdash_core::webhook::{self, EVENT_STATUS_PENDING};
use revdash_db::models::webhook_event::NewWebhookEvent;
use revdash_db::repositories::{WebhookEventRepo, WorkflowRepo};
use revdash_events::{kinds, PlatformEvent};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: workflowId, source, eventType";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericWebhook {
    pub workflow_id: Option<DbId>,
    pub source: Option<String>,
    pub event_type: Option<String>,
    pub payload: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GenericAck {
    pub success: bool,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// POST /webhooks/generic
// ---------------------------------------------------------------------------

/// Store an event from an arbitrary source as `pending`.
pub async fn receive_generic(
    State(state): State<AppState>,
    Json(body): Json<GenericWebhook>,
) -> AppResult<impl IntoResponse> {
    let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
    let (Some(workflow_id), Some(source), Some(event_type)) = (
        body.workflow_id,
        non_blank(body.source),
        non_blank(body.event_type),
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.into()));
    };
    let source = webhook::normalize_source(&source)?;

    if !WorkflowRepo::exists(&state.pool, workflow_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id: workflow_id,
        }));
    }

    let received_at = chrono::Utc::now().to_rfc3339();
    let event = WebhookEventRepo::create(
        &state.pool,
        &NewWebhookEvent {
            workflow_id,
            source: source.clone(),
            event_type: event_type.clone(),
            payload: webhook::merge_payload(body.payload, [], &received_at),
            status: EVENT_STATUS_PENDING,
        },
    )
    .await?;

    tracing::info!(workflow_id, source = %source, event_id = event.id, "Generic webhook received");
    state.event_bus.publish(
        PlatformEvent::new(kinds::WEBHOOK_RECEIVED)
            .with_workflow(workflow_id)
            .with_entity("webhook_event", event.id)
            .with_payload(json!({ "source": source, "eventType": event_type })),
    );

    Ok(Json(GenericAck {
        success: true,
        message: "Generic webhook processed successfully",
    }))
}
