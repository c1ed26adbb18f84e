use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use revdash_core::types::DbId;
use revdash_core::webhook;
use revdash_db::models::webhook_event::WebhookEventFilter;
use revdash_db::repositories::WebhookEventRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WebhookEventListParams {
    pub status: Option<String>,
    pub source: Option<String>,
    pub workflow_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// GET /webhook-events
// ---------------------------------------------------------------------------

pub async fn list_webhook_events(
    State(state): State<AppState>,
    Query(params): Query<WebhookEventListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref s) = params.status {
        webhook::validate_event_status(s)?;
    }
    let source = params
        .source
        .as_deref()
        .map(webhook::normalize_source)
        .transpose()?;

    let filter = WebhookEventFilter {
        status: params.status,
        source,
        workflow_id: params.workflow_id,
    };
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let events = WebhookEventRepo::list_filtered(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: events }))
}
