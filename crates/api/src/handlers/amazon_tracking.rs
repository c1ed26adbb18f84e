use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::{affiliate, transaction};
use revdash_core::error::CoreError;
use revdash_core::types::DbId;
use revdash_db::models::amazon_tracking::{CreateAmazonTrackingId, UpdateTrackingPerformance};
use revdash_db::repositories::AmazonTrackingRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BestTrackingParams {
    pub region: String,
}

// ---------------------------------------------------------------------------
// GET /amazon-tracking
// ---------------------------------------------------------------------------

pub async fn list_tracking_ids(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let ids = AmazonTrackingRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: ids }))
}

// ---------------------------------------------------------------------------
// POST /amazon-tracking
// ---------------------------------------------------------------------------

/// Register a tracking ID. Duplicates surface as 409 via the unique constraint.
pub async fn create_tracking_id(
    State(state): State<AppState>,
    Json(mut input): Json<CreateAmazonTrackingId>,
) -> AppResult<impl IntoResponse> {
    let tracking_id = input.tracking_id.trim();
    if tracking_id.is_empty() || tracking_id.len() > 100 {
        return Err(AppError::BadRequest(
            "tracking_id must be 1-100 characters".into(),
        ));
    }
    input.region = affiliate::normalize_region(&input.region)?;
    if let Some(ref status) = input.status {
        affiliate::validate_tracking_status(status)?;
    }

    let created = AmazonTrackingRepo::create(&state.pool, &input).await?;
    tracing::info!(
        id = created.id,
        tracking_id = %created.tracking_id,
        region = %created.region,
        "Tracking ID registered",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /amazon-tracking/{id}/performance
// ---------------------------------------------------------------------------

pub async fn update_tracking_performance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrackingPerformance>,
) -> AppResult<impl IntoResponse> {
    affiliate::validate_performance_score(input.performance_score)?;
    affiliate::validate_counters(&[
        ("total_clicks", i64::from(input.total_clicks.unwrap_or(0))),
        ("total_conversions", i64::from(input.total_conversions.unwrap_or(0))),
        ("usage_count", i64::from(input.usage_count.unwrap_or(0))),
    ])?;
    if let Some(revenue) = input.total_revenue {
        transaction::validate_money("total_revenue", revenue)?;
    }

    let updated = AmazonTrackingRepo::update_performance(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tracking ID",
            id,
        }))?;

    tracing::debug!(id, score = updated.performance_score, "Tracking ID performance updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /amazon-tracking/best?region=
// ---------------------------------------------------------------------------

/// The top active tracking IDs for a marketplace region.
pub async fn best_tracking_ids(
    State(state): State<AppState>,
    Query(params): Query<BestTrackingParams>,
) -> AppResult<impl IntoResponse> {
    let region = affiliate::normalize_region(&params.region)?;
    let ids = AmazonTrackingRepo::best_performing(&state.pool, &region).await?;
    Ok(Json(DataResponse { data: ids }))
}
