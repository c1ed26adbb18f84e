use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::metrics::success_rate;
use revdash_core::types::DbId;
use revdash_db::models::api_usage::{ApiUsageSummary, CreateApiUsage};
use revdash_db::repositories::ApiUsageRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApiUsageListParams {
    pub workflow_id: Option<DbId>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api-usage
// ---------------------------------------------------------------------------

pub async fn list_api_usage(
    State(state): State<AppState>,
    Query(params): Query<ApiUsageListParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end) = DateRangeParams {
        start_date: params.start_date,
        end_date: params.end_date,
    }
    .parse()?;
    let rows = ApiUsageRepo::list_filtered(&state.pool, params.workflow_id, start, end).await?;
    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// POST /api-usage
// ---------------------------------------------------------------------------

pub async fn record_api_usage(
    State(state): State<AppState>,
    Json(input): Json<CreateApiUsage>,
) -> AppResult<impl IntoResponse> {
    if input.endpoint.trim().is_empty() || input.method.trim().is_empty() {
        return Err(AppError::BadRequest(
            "endpoint and method must not be empty".into(),
        ));
    }

    let row = ApiUsageRepo::create(&state.pool, &input).await?;
    tracing::debug!(
        workflow_id = row.workflow_id,
        endpoint = %row.endpoint,
        success = row.success,
        "API usage recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

// ---------------------------------------------------------------------------
// GET /api-usage/summary
// ---------------------------------------------------------------------------

pub async fn api_usage_summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let totals = ApiUsageRepo::totals(&state.pool).await?;
    let summary = ApiUsageSummary {
        total_calls: totals.total_calls,
        success_calls: totals.success_calls,
        avg_response_time: totals.avg_response_time,
        success_rate: success_rate(totals.success_calls, totals.total_calls),
    };
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// GET /api-usage/endpoints
// ---------------------------------------------------------------------------

pub async fn api_usage_by_endpoint(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = ApiUsageRepo::by_endpoint(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}
