use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::{affiliate, transaction};
use revdash_core::pagination::{clamp_limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT};
use revdash_core::types::DbId;
use revdash_db::models::affiliate_metric::{AffiliateTotals, CreateAffiliateMetric, RegionTotals};
use revdash_db::repositories::AffiliateMetricRepo;
use revdash_events::{kinds, PlatformEvent};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AffiliateMetricListParams {
    pub workflow_id: Option<DbId>,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopPerformerParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AffiliateSummary {
    #[serde(flatten)]
    pub totals: AffiliateTotals,
    /// Conversions per impression across all rows, as a percentage.
    pub conversion_rate: f64,
    pub regions: Vec<RegionTotals>,
}

// ---------------------------------------------------------------------------
// GET /affiliate-metrics
// ---------------------------------------------------------------------------

pub async fn list_affiliate_metrics(
    State(state): State<AppState>,
    Query(params): Query<AffiliateMetricListParams>,
) -> AppResult<impl IntoResponse> {
    let region = params
        .region
        .as_deref()
        .map(affiliate::normalize_region)
        .transpose()?;

    let metrics =
        AffiliateMetricRepo::list_filtered(&state.pool, params.workflow_id, region.as_deref())
            .await?;

    Ok(Json(DataResponse { data: metrics }))
}

// ---------------------------------------------------------------------------
// POST /affiliate-metrics
// ---------------------------------------------------------------------------

/// Record a day of affiliate counters. The conversion rate is derived here.
pub async fn create_affiliate_metric(
    State(state): State<AppState>,
    Json(mut input): Json<CreateAffiliateMetric>,
) -> AppResult<impl IntoResponse> {
    if input.tracking_id.trim().is_empty() {
        return Err(AppError::BadRequest("tracking_id must not be empty".into()));
    }
    input.region = affiliate::normalize_region(&input.region)?;
    affiliate::validate_counters(&[
        ("clicks", i64::from(input.clicks)),
        ("impressions", i64::from(input.impressions)),
        ("conversions", i64::from(input.conversions)),
    ])?;
    affiliate::validate_performance_score(input.performance_score)?;
    transaction::validate_money("revenue", input.revenue)?;
    transaction::validate_money("commission", input.commission)?;

    let rate = affiliate::conversion_rate(
        i64::from(input.conversions),
        i64::from(input.impressions),
    );
    let metric = AffiliateMetricRepo::create(&state.pool, &input, rate).await?;

    tracing::info!(
        metric_id = metric.id,
        workflow_id = metric.workflow_id,
        region = %metric.region,
        "Affiliate metric recorded",
    );
    state.event_bus.publish(
        PlatformEvent::new(kinds::METRIC_RECORDED)
            .with_workflow(metric.workflow_id)
            .with_entity("affiliate_metric", metric.id)
            .with_payload(json!({
                "trackingId": metric.tracking_id,
                "region": metric.region,
                "revenue": metric.revenue,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: metric })))
}

// ---------------------------------------------------------------------------
// GET /affiliate-metrics/top-performers
// ---------------------------------------------------------------------------

pub async fn top_performers(
    State(state): State<AppState>,
    Query(params): Query<TopPerformerParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT);
    let performers = AffiliateMetricRepo::top_performers(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: performers }))
}

// ---------------------------------------------------------------------------
// GET /affiliate-metrics/summary
// ---------------------------------------------------------------------------

pub async fn affiliate_summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let totals = AffiliateMetricRepo::totals(&state.pool).await?;
    let regions = AffiliateMetricRepo::totals_by_region(&state.pool).await?;
    let conversion_rate = affiliate::conversion_rate(totals.conversions, totals.impressions);

    Ok(Json(DataResponse {
        data: AffiliateSummary {
            totals,
            conversion_rate,
            regions,
        },
    }))
}
