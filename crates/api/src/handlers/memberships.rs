use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::{membership, transaction};
use revdash_db::models::membership::CreateMembership;
use revdash_db::repositories::MembershipRepo;
use revdash_events::{kinds, PlatformEvent};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /memberships
// ---------------------------------------------------------------------------

pub async fn list_memberships(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let memberships = MembershipRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: memberships }))
}

// ---------------------------------------------------------------------------
// POST /memberships
// ---------------------------------------------------------------------------

pub async fn create_membership(
    State(state): State<AppState>,
    Json(mut input): Json<CreateMembership>,
) -> AppResult<impl IntoResponse> {
    if input.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".into()));
    }
    membership::validate_tier(&input.tier)?;
    if let Some(ref status) = input.status {
        membership::validate_status(status)?;
    }
    transaction::validate_amount(input.amount)?;
    input.currency = Some(transaction::normalize_currency(input.currency.as_deref())?);

    let created = MembershipRepo::create(&state.pool, &input).await?;

    tracing::info!(
        membership_id = created.id,
        workflow_id = created.workflow_id,
        tier = %created.tier,
        "Membership created",
    );
    state.event_bus.publish(
        PlatformEvent::new(kinds::MEMBERSHIP_UPDATED)
            .with_workflow(created.workflow_id)
            .with_entity("membership", created.id)
            .with_payload(json!({ "tier": created.tier, "status": created.status })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /memberships/summary
// ---------------------------------------------------------------------------

/// Member counts per tier, the active count, and revenue per tier.
pub async fn membership_summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = MembershipRepo::summary(&state.pool).await?;
    Ok(Json(DataResponse { data: summary }))
}
