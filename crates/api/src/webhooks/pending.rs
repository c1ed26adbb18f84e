//! Processing of queued (`pending`) webhook events.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::webhook::PROCESS_PENDING_BATCH;
use revdash_db::repositories::WebhookEventRepo;
use revdash_db::DbPool;
use revdash_events::{kinds, EventBus, PlatformEvent};
use serde::Serialize;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProcessPendingAck {
    pub success: bool,
    pub message: String,
    pub processed: usize,
}

/// Mark the oldest batch of pending events processed and announce them.
///
/// Shared by the HTTP endpoint and the background sweeper.
pub async fn process_pending_batch(
    pool: &DbPool,
    event_bus: &EventBus,
) -> Result<usize, sqlx::Error> {
    let ids = WebhookEventRepo::process_pending(pool, PROCESS_PENDING_BATCH).await?;
    if !ids.is_empty() {
        event_bus.publish(
            PlatformEvent::new(kinds::WEBHOOKS_PROCESSED)
                .with_payload(json!({ "count": ids.len(), "ids": ids })),
        );
    }
    Ok(ids.len())
}

// ---------------------------------------------------------------------------
// POST /webhooks/process-pending
// ---------------------------------------------------------------------------

pub async fn process_pending(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let processed = process_pending_batch(&state.pool, &state.event_bus).await?;
    tracing::info!(processed, "Processed pending webhooks");

    Ok(Json(ProcessPendingAck {
        success: true,
        message: format!("Processed {processed} pending webhooks"),
        processed,
    }))
}
