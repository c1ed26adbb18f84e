//! Handlers for alerts and their `active -> acknowledged -> resolved`
//! lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::alert;
use revdash_core::error::CoreError;
use revdash_core::types::DbId;
use revdash_db::models::alert::{Alert, CreateAlert};
use revdash_db::repositories::AlertRepo;
use revdash_db::DbPool;
use revdash_events::{kinds, PlatformEvent};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertListParams {
    pub status: Option<String>,
    pub workflow_id: Option<DbId>,
}

fn alert_event(event_type: &str, alert: &Alert) -> PlatformEvent {
    let mut event = PlatformEvent::new(event_type)
        .with_entity("alert", alert.id)
        .with_payload(json!({
            "type": alert.alert_type,
            "severity": alert.severity,
            "status": alert.status,
            "title": alert.title,
        }));
    if let Some(workflow_id) = alert.workflow_id {
        event = event.with_workflow(workflow_id);
    }
    event
}

// ---------------------------------------------------------------------------
// GET /alerts
// ---------------------------------------------------------------------------

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref s) = params.status {
        alert::validate_status(s)?;
    }
    let alerts =
        AlertRepo::list_filtered(&state.pool, params.status.as_deref(), params.workflow_id)
            .await?;
    Ok(Json(DataResponse { data: alerts }))
}

// ---------------------------------------------------------------------------
// POST /alerts
// ---------------------------------------------------------------------------

pub async fn create_alert(
    State(state): State<AppState>,
    Json(mut input): Json<CreateAlert>,
) -> AppResult<impl IntoResponse> {
    alert::validate_type(&input.alert_type)?;
    alert::validate_content(&input.title, &input.message)?;
    let severity = input
        .severity
        .take()
        .unwrap_or_else(|| alert::DEFAULT_SEVERITY.to_string());
    alert::validate_severity(&severity)?;
    input.severity = Some(severity);

    let created = AlertRepo::create(&state.pool, &input).await?;

    tracing::info!(
        alert_id = created.id,
        workflow_id = ?created.workflow_id,
        severity = %created.severity,
        "Alert created",
    );
    state
        .event_bus
        .publish(alert_event(kinds::ALERT_CREATED, &created));

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// POST /alerts/{id}/acknowledge
// ---------------------------------------------------------------------------

pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated = transition(&state.pool, id, alert::STATUS_ACKNOWLEDGED).await?;
    tracing::info!(alert_id = id, "Alert acknowledged");
    state
        .event_bus
        .publish(alert_event(kinds::ALERT_UPDATED, &updated));
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// POST /alerts/{id}/resolve
// ---------------------------------------------------------------------------

pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated = transition(&state.pool, id, alert::STATUS_RESOLVED).await?;
    tracing::info!(alert_id = id, "Alert resolved");
    state
        .event_bus
        .publish(alert_event(kinds::ALERT_UPDATED, &updated));
    Ok(Json(DataResponse { data: updated }))
}

/// Move an alert to `next`, guarding against concurrent transitions.
///
/// The update only applies while the row still has the status we
/// validated against; losing that race re-reads and re-validates.
async fn transition(pool: &DbPool, id: DbId, next: &str) -> AppResult<Alert> {
    let current = AlertRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Alert", id }))?;
    alert::validate_transition(&current.status, next)?;

    let updated = if next == alert::STATUS_ACKNOWLEDGED {
        AlertRepo::acknowledge(pool, id, &current.status).await?
    } else {
        AlertRepo::resolve(pool, id, &current.status).await?
    };

    match updated {
        Some(alert) => Ok(alert),
        None => {
            let latest = AlertRepo::find_by_id(pool, id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound { entity: "Alert", id }))?;
            alert::validate_transition(&latest.status, next)?;
            Err(AppError::Core(CoreError::Conflict(format!(
                "Alert {id} changed while being updated"
            ))))
        }
    }
}
