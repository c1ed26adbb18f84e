//! Handlers for transactions and the revenue series behind the chart.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use revdash_core::error::CoreError;
use revdash_core::metrics::{RevenuePoint, RevenueSummary};
use revdash_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use revdash_core::transaction::{self, TransactionSort};
use revdash_core::types::DbId;
use revdash_db::models::transaction::{CreateTransaction, UpdateTransactionStatus};
use revdash_db::repositories::TransactionRepo;
use revdash_events::{kinds, PlatformEvent};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Window used by the revenue chart when the client sends no start date.
const DEFAULT_REVENUE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub workflow_id: Option<DbId>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevenueSeries {
    pub points: Vec<RevenuePoint>,
    pub summary: RevenueSummary,
}

// ---------------------------------------------------------------------------
// GET /transactions
// ---------------------------------------------------------------------------

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> AppResult<impl IntoResponse> {
    let sort = TransactionSort::parse(params.sort.as_deref(), params.direction.as_deref())?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let transactions =
        TransactionRepo::list(&state.pool, params.workflow_id, sort, limit, offset).await?;

    Ok(Json(DataResponse { data: transactions }))
}

// ---------------------------------------------------------------------------
// POST /transactions
// ---------------------------------------------------------------------------

/// Record a transaction. It starts out `pending`.
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(mut input): Json<CreateTransaction>,
) -> AppResult<impl IntoResponse> {
    transaction::validate_type(&input.transaction_type)?;
    transaction::validate_amount(input.amount)?;
    input.currency = Some(transaction::normalize_currency(input.currency.as_deref())?);
    if input.source.trim().is_empty() {
        return Err(AppError::BadRequest("source must not be empty".into()));
    }

    let created =
        TransactionRepo::create(&state.pool, &input, transaction::STATUS_PENDING).await?;

    tracing::info!(
        transaction_id = created.id,
        workflow_id = created.workflow_id,
        amount = created.amount,
        "Transaction created",
    );
    state.event_bus.publish(
        PlatformEvent::new(kinds::TRANSACTION_CREATED)
            .with_workflow(created.workflow_id)
            .with_entity("transaction", created.id)
            .with_payload(json!({
                "type": created.transaction_type,
                "amount": created.amount,
                "status": created.status,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /transactions/{id}/status
// ---------------------------------------------------------------------------

pub async fn update_transaction_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransactionStatus>,
) -> AppResult<impl IntoResponse> {
    transaction::validate_status(&input.status)?;

    let updated = TransactionRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Transaction",
            id,
        }))?;

    tracing::info!(transaction_id = id, status = %updated.status, "Transaction status updated");
    state.event_bus.publish(
        PlatformEvent::new(kinds::TRANSACTION_STATUS_CHANGED)
            .with_workflow(updated.workflow_id)
            .with_entity("transaction", id)
            .with_payload(json!({ "status": updated.status, "amount": updated.amount })),
    );

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /transactions/revenue-by-date
// ---------------------------------------------------------------------------

/// Completed revenue per UTC day plus total/average/peak.
///
/// `end_date` defaults to now and `start_date` to 30 days before the end.
pub async fn revenue_by_date(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end) = params.parse()?;
    let end = end.unwrap_or_else(Utc::now);
    let start = start.unwrap_or(end - Duration::days(DEFAULT_REVENUE_WINDOW_DAYS));
    if start > end {
        return Err(AppError::Core(CoreError::Validation(
            "start_date must not be after end_date".into(),
        )));
    }

    let points: Vec<RevenuePoint> = TransactionRepo::revenue_by_day(&state.pool, start, end)
        .await?
        .into_iter()
        .map(|row| RevenuePoint {
            date: row.day,
            revenue: row.revenue,
            transactions: row.transactions,
            workflows: row.workflows,
        })
        .collect();
    let summary = RevenueSummary::from_points(&points);

    Ok(Json(DataResponse {
        data: RevenueSeries { points, summary },
    }))
}

// ---------------------------------------------------------------------------
// GET /transactions/counts
// ---------------------------------------------------------------------------

pub async fn transaction_counts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let counts = TransactionRepo::counts(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}
