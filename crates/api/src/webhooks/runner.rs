//! Receivers for workflow runners (n8n and Make).
//!
//! Both runners post an execution report for one workflow. The report is
//! stored as a pending webhook event; an execution time becomes a real-time
//! metric; a status moves the workflow and its run statistics, and a failed
//! run raises an alert. All writes share one database transaction and the
//! workflow row is locked for its duration, so concurrent reports for the
//! same workflow fold into the counters one at a time.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::alert;
use revdash_core::error::CoreError;
use revdash_core::metrics::{
    METRIC_EXECUTION_DURATION, METRIC_EXECUTION_TIME, UNIT_MILLISECONDS, UNIT_SECONDS,
};
use revdash_core::types::DbId;
use revdash_core::webhook::{
    self, DEFAULT_MAKE_EVENT_TYPE, DEFAULT_N8N_EVENT_TYPE, EVENT_STATUS_PENDING, SOURCE_MAKE,
    SOURCE_N8N,
};
use revdash_core::workflow::{map_make_status, map_n8n_status, RunOutcome, StatusReport};
use revdash_db::models::alert::{Alert, CreateAlert};
use revdash_db::models::realtime_metric::{CreateRealTimeMetric, RealTimeMetric};
use revdash_db::models::webhook_event::NewWebhookEvent;
use revdash_db::models::workflow::Workflow;
use revdash_db::repositories::{AlertRepo, RealTimeMetricRepo, WebhookEventRepo, WorkflowRepo};
use revdash_events::{kinds, PlatformEvent};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Execution report posted by n8n.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct N8nWebhook {
    pub workflow_id: Option<DbId>,
    pub event_type: Option<String>,
    pub payload: Option<Value>,
    pub execution_id: Option<Value>,
    pub status: Option<String>,
    /// Milliseconds.
    pub execution_time: Option<f64>,
    pub output: Option<Value>,
    pub error: Option<Value>,
}

/// Scenario report posted by Make.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeWebhook {
    pub workflow_id: Option<DbId>,
    pub event_type: Option<String>,
    pub payload: Option<Value>,
    pub scenario_id: Option<Value>,
    pub execution_id: Option<Value>,
    pub status: Option<String>,
    /// Seconds.
    pub duration: Option<f64>,
    pub result: Option<Value>,
    pub error: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerAck {
    pub success: bool,
    pub message: &'static str,
    pub workflow_id: DbId,
    pub event_type: String,
}

// ---------------------------------------------------------------------------
// Normalized report
// ---------------------------------------------------------------------------

/// A runner report with runner specifics resolved.
struct RunnerReport {
    source: &'static str,
    workflow_id: DbId,
    event_type: String,
    /// Stored event payload (already merged with runner metadata).
    payload: Value,
    /// `(metric_type, value, unit, metadata)` when the runner reported timing.
    metric: Option<(&'static str, f64, &'static str, Value)>,
    status: Option<StatusReport>,
    /// Run duration in seconds, for the workflow's average.
    duration_secs: Option<f64>,
    error: Option<Value>,
    ack_message: &'static str,
}

/// A blank status is not a run report.
fn reported_status(status: Option<&str>) -> Option<&str> {
    status.map(str::trim).filter(|s| !s.is_empty())
}

fn require_workflow_id(workflow_id: Option<DbId>) -> AppResult<DbId> {
    workflow_id.ok_or_else(|| AppError::BadRequest("Missing required field: workflowId".into()))
}

impl RunnerReport {
    fn from_n8n(body: N8nWebhook, received_at: &str) -> AppResult<Self> {
        let workflow_id = require_workflow_id(body.workflow_id)?;
        let event_type = body
            .event_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_N8N_EVENT_TYPE.to_string());

        let metric = body.execution_time.map(|ms| {
            (
                METRIC_EXECUTION_TIME,
                ms,
                UNIT_MILLISECONDS,
                json!({
                    "executionId": body.execution_id,
                    "source": SOURCE_N8N,
                    "status": body.status,
                }),
            )
        });

        let payload = webhook::merge_payload(
            body.payload,
            [
                ("executionId", body.execution_id.unwrap_or(Value::Null)),
                ("status", json!(body.status)),
                ("output", body.output.unwrap_or(Value::Null)),
                ("error", body.error.clone().unwrap_or(Value::Null)),
            ],
            received_at,
        );

        Ok(Self {
            source: SOURCE_N8N,
            workflow_id,
            event_type,
            payload,
            metric,
            status: reported_status(body.status.as_deref()).map(map_n8n_status),
            duration_secs: body.execution_time.map(|ms| ms / 1000.0),
            error: body.error,
            ack_message: "Webhook processed successfully",
        })
    }

    fn from_make(body: MakeWebhook, received_at: &str) -> AppResult<Self> {
        let workflow_id = require_workflow_id(body.workflow_id)?;
        let event_type = body
            .event_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MAKE_EVENT_TYPE.to_string());

        let metric = body.duration.map(|secs| {
            (
                METRIC_EXECUTION_DURATION,
                secs,
                UNIT_SECONDS,
                json!({
                    "scenarioId": body.scenario_id,
                    "executionId": body.execution_id,
                    "source": SOURCE_MAKE,
                    "status": body.status,
                }),
            )
        });

        let payload = webhook::merge_payload(
            body.payload,
            [
                ("scenarioId", body.scenario_id.unwrap_or(Value::Null)),
                ("executionId", body.execution_id.unwrap_or(Value::Null)),
                ("status", json!(body.status)),
                ("duration", json!(body.duration)),
                ("result", body.result.unwrap_or(Value::Null)),
                ("error", body.error.clone().unwrap_or(Value::Null)),
            ],
            received_at,
        );

        Ok(Self {
            source: SOURCE_MAKE,
            workflow_id,
            event_type,
            payload,
            metric,
            status: reported_status(body.status.as_deref()).map(map_make_status),
            duration_secs: body.duration,
            error: body.error,
            ack_message: "Make webhook processed successfully",
        })
    }
}

// ---------------------------------------------------------------------------
// POST /webhooks/n8n
// ---------------------------------------------------------------------------

pub async fn receive_n8n(
    State(state): State<AppState>,
    Json(body): Json<N8nWebhook>,
) -> AppResult<impl IntoResponse> {
    let received_at = chrono::Utc::now().to_rfc3339();
    let report = RunnerReport::from_n8n(body, &received_at)?;
    ingest(&state, report).await
}

// ---------------------------------------------------------------------------
// POST /webhooks/make
// ---------------------------------------------------------------------------

pub async fn receive_make(
    State(state): State<AppState>,
    Json(body): Json<MakeWebhook>,
) -> AppResult<impl IntoResponse> {
    let received_at = chrono::Utc::now().to_rfc3339();
    let report = RunnerReport::from_make(body, &received_at)?;
    ingest(&state, report).await
}

// ---------------------------------------------------------------------------
// Shared ingestion
// ---------------------------------------------------------------------------

/// What a report changed, for publishing once the transaction commits.
struct Ingested {
    event_id: DbId,
    metric: Option<RealTimeMetric>,
    workflow: Option<Workflow>,
    alert: Option<Alert>,
}

async fn ingest(state: &AppState, report: RunnerReport) -> AppResult<Json<RunnerAck>> {
    let workflow_id = report.workflow_id;
    let mut tx = state.pool.begin().await?;

    let workflow = WorkflowRepo::find_by_id_for_update(&mut *tx, workflow_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id: workflow_id,
        }))?;

    let event = WebhookEventRepo::create(
        &mut *tx,
        &NewWebhookEvent {
            workflow_id,
            source: report.source.to_string(),
            event_type: report.event_type.clone(),
            payload: report.payload,
            status: EVENT_STATUS_PENDING,
        },
    )
    .await?;

    let metric = match report.metric {
        Some((metric_type, value, unit, metadata)) => Some(
            RealTimeMetricRepo::create(
                &mut *tx,
                &CreateRealTimeMetric {
                    workflow_id,
                    metric_type: metric_type.to_string(),
                    value,
                    unit: unit.to_string(),
                    metadata: Some(metadata),
                },
            )
            .await?,
        ),
        None => None,
    };

    let mut updated = None;
    let mut raised = None;
    if let Some(status) = report.status {
        let stats = workflow
            .run_stats()
            .record(status.outcome, report.duration_secs);
        updated =
            WorkflowRepo::record_run(&mut *tx, workflow_id, status.workflow_status, &stats).await?;

        if status.outcome == RunOutcome::Failed {
            let alert = AlertRepo::create(
                &mut *tx,
                &CreateAlert {
                    workflow_id: Some(workflow_id),
                    alert_type: alert::TYPE_ERROR.to_string(),
                    title: format!("Workflow '{}' failed", workflow.name),
                    message: failure_message(report.source, report.error.as_ref()),
                    severity: Some(alert::SEVERITY_HIGH.to_string()),
                },
            )
            .await?;
            raised = Some(alert);
        }
    }

    tx.commit().await?;

    tracing::info!(
        workflow_id,
        source = report.source,
        event_type = %report.event_type,
        event_id = event.id,
        "Webhook received",
    );

    publish(
        state,
        report.source,
        &report.event_type,
        workflow_id,
        Ingested {
            event_id: event.id,
            metric,
            workflow: updated,
            alert: raised,
        },
    );

    Ok(Json(RunnerAck {
        success: true,
        message: report.ack_message,
        workflow_id,
        event_type: report.event_type,
    }))
}

/// Alert body for a failed run, using the runner's error when it sent one.
fn failure_message(source: &str, error: Option<&Value>) -> String {
    match error {
        Some(Value::String(msg)) if !msg.trim().is_empty() => msg.clone(),
        Some(Value::Null) | None => format!("Execution reported as failed by {source}"),
        Some(other) => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

fn publish(state: &AppState, source: &str, event_type: &str, workflow_id: DbId, done: Ingested) {
    let bus = &state.event_bus;

    bus.publish(
        PlatformEvent::new(kinds::WEBHOOK_RECEIVED)
            .with_workflow(workflow_id)
            .with_entity("webhook_event", done.event_id)
            .with_payload(json!({ "source": source, "eventType": event_type })),
    );

    if let Some(metric) = done.metric {
        bus.publish(
            PlatformEvent::new(kinds::METRIC_RECORDED)
                .with_workflow(workflow_id)
                .with_entity("real_time_metric", metric.id)
                .with_payload(json!({
                    "metricType": metric.metric_type,
                    "value": metric.value,
                    "unit": metric.unit,
                })),
        );
    }

    if let Some(workflow) = done.workflow {
        bus.publish(
            PlatformEvent::new(kinds::WORKFLOW_STATUS_CHANGED)
                .with_workflow(workflow_id)
                .with_entity("workflow", workflow_id)
                .with_payload(json!({
                    "status": workflow.status,
                    "executionCount": workflow.execution_count,
                    "successRate": workflow.success_rate,
                    "avgExecutionTime": workflow.avg_execution_time,
                })),
        );
    }

    if let Some(alert) = done.alert {
        bus.publish(
            PlatformEvent::new(kinds::ALERT_CREATED)
                .with_workflow(workflow_id)
                .with_entity("alert", alert.id)
                .with_payload(json!({
                    "type": alert.alert_type,
                    "severity": alert.severity,
                    "title": alert.title,
                })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIVED: &str = "2026-03-01T00:00:00Z";

    #[test]
    fn n8n_report_defaults_and_conversions() {
        let body: N8nWebhook = serde_json::from_value(json!({
            "workflowId": 3,
            "executionId": "ex-9",
            "status": "completed",
            "executionTime": 1500.0,
            "payload": {"orders": 2}
        }))
        .unwrap();

        let report = RunnerReport::from_n8n(body, RECEIVED).unwrap();
        assert_eq!(report.event_type, "execution");
        assert_eq!(report.duration_secs, Some(1.5));
        assert_eq!(report.payload["orders"], 2);
        assert_eq!(report.payload["executionId"], "ex-9");
        assert_eq!(report.payload["receivedAt"], RECEIVED);

        let (metric_type, value, unit, _) = report.metric.unwrap();
        assert_eq!((metric_type, value, unit), ("execution_time", 1500.0, "milliseconds"));
        assert_eq!(report.status.unwrap().outcome, RunOutcome::Succeeded);
    }

    #[test]
    fn make_report_keeps_seconds() {
        let body: MakeWebhook = serde_json::from_value(json!({
            "workflowId": 3,
            "scenarioId": 77,
            "status": "error",
            "duration": 12.5
        }))
        .unwrap();

        let report = RunnerReport::from_make(body, RECEIVED).unwrap();
        assert_eq!(report.event_type, "scenario_execution");
        assert_eq!(report.duration_secs, Some(12.5));
        assert_eq!(report.payload["scenarioId"], 77);
        assert_eq!(report.metric.unwrap().2, "seconds");
        assert_eq!(report.status.unwrap().outcome, RunOutcome::Failed);
    }

    #[test]
    fn blank_status_is_not_a_run_report() {
        let body: N8nWebhook =
            serde_json::from_value(json!({"workflowId": 3, "status": "  "})).unwrap();
        let report = RunnerReport::from_n8n(body, RECEIVED).unwrap();
        assert!(report.status.is_none());
        assert_eq!(reported_status(Some(" success ")), Some("success"));
    }

    #[test]
    fn missing_workflow_id_is_a_bad_request() {
        let body: N8nWebhook = serde_json::from_value(json!({"status": "completed"})).unwrap();
        assert!(matches!(
            RunnerReport::from_n8n(body, RECEIVED),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn failure_message_prefers_runner_error() {
        assert_eq!(failure_message("n8n", Some(&json!("HTTP 502"))), "HTTP 502");
        assert_eq!(
            failure_message("make", Some(&json!({"message": "quota exceeded"}))),
            "quota exceeded"
        );
        assert_eq!(
            failure_message("n8n", None),
            "Execution reported as failed by n8n"
        );
    }
}
