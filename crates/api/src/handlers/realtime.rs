use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::pagination::{clamp_limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use revdash_core::types::DbId;
use revdash_db::models::realtime_metric::CreateRealTimeMetric;
use revdash_db::repositories::RealTimeMetricRepo;
use revdash_events::{kinds, PlatformEvent};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetricListParams {
    pub workflow_id: Option<DbId>,
    pub metric_type: Option<String>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// GET /realtime/metrics
// ---------------------------------------------------------------------------

pub async fn list_metrics(
    State(state): State<AppState>,
    Query(params): Query<MetricListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let metrics = RealTimeMetricRepo::list_latest(
        &state.pool,
        params.workflow_id,
        params.metric_type.as_deref(),
        limit,
    )
    .await?;
    Ok(Json(DataResponse { data: metrics }))
}

// ---------------------------------------------------------------------------
// POST /realtime/metrics
// ---------------------------------------------------------------------------

pub async fn record_metric(
    State(state): State<AppState>,
    Json(input): Json<CreateRealTimeMetric>,
) -> AppResult<impl IntoResponse> {
    if input.metric_type.trim().is_empty() {
        return Err(AppError::BadRequest("metric_type must not be empty".into()));
    }
    if !input.value.is_finite() {
        return Err(AppError::BadRequest("value must be a finite number".into()));
    }

    let metric = RealTimeMetricRepo::create(&state.pool, &input).await?;

    state.event_bus.publish(
        PlatformEvent::new(kinds::METRIC_RECORDED)
            .with_workflow(metric.workflow_id)
            .with_entity("real_time_metric", metric.id)
            .with_payload(json!({
                "metricType": metric.metric_type,
                "value": metric.value,
                "unit": metric.unit,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: metric })))
}
