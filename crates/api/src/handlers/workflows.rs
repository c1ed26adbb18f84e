//! Handlers for workflows and their key/value configuration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use revdash_core::error::CoreError;
use revdash_core::types::DbId;
use revdash_core::workflow;
use revdash_db::models::workflow::{CreateWorkflow, UpdateWorkflow};
use revdash_db::models::workflow_config::UpsertWorkflowConfig;
use revdash_db::repositories::{WorkflowConfigRepo, WorkflowRepo};
use revdash_events::{kinds, PlatformEvent};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a workflow or fail with 404.
async fn ensure_workflow_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if WorkflowRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// GET /workflows
// ---------------------------------------------------------------------------

pub async fn list_workflows(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let workflows = WorkflowRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: workflows }))
}

// ---------------------------------------------------------------------------
// GET /workflows/stats
// ---------------------------------------------------------------------------

pub async fn workflow_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = WorkflowRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// GET /workflows/{id}
// ---------------------------------------------------------------------------

pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workflow = WorkflowRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }))?;
    Ok(Json(DataResponse { data: workflow }))
}

// ---------------------------------------------------------------------------
// POST /workflows
// ---------------------------------------------------------------------------

/// Create a workflow. New workflows start `inactive` with zeroed counters.
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflow>,
) -> AppResult<impl IntoResponse> {
    workflow::validate_name(&input.name)?;

    let created = WorkflowRepo::create(&state.pool, &input).await?;

    tracing::info!(workflow_id = created.id, name = %created.name, "Workflow created");
    state.event_bus.publish(
        PlatformEvent::new(kinds::WORKFLOW_CREATED)
            .with_workflow(created.id)
            .with_entity("workflow", created.id)
            .with_payload(json!({ "name": created.name })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /workflows/{id}
// ---------------------------------------------------------------------------

pub async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkflow>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        workflow::validate_name(name)?;
    }
    if let Some(ref status) = input.status {
        workflow::validate_status(status)?;
    }

    let updated = WorkflowRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }))?;

    tracing::info!(workflow_id = id, status = %updated.status, "Workflow updated");
    state.event_bus.publish(
        PlatformEvent::new(kinds::WORKFLOW_UPDATED)
            .with_workflow(id)
            .with_entity("workflow", id)
            .with_payload(json!({ "status": updated.status })),
    );

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /workflows/{id}
// ---------------------------------------------------------------------------

/// Delete a workflow; child rows go with it.
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !WorkflowRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }));
    }

    tracing::info!(workflow_id = id, "Workflow deleted");
    state.event_bus.publish(
        PlatformEvent::new(kinds::WORKFLOW_DELETED)
            .with_workflow(id)
            .with_entity("workflow", id),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /workflows/{id}/config
// ---------------------------------------------------------------------------

pub async fn list_workflow_config(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_workflow_exists(&state, id).await?;
    let entries = WorkflowConfigRepo::list_for_workflow(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// Config keys are stored trimmed, so lookups trim too.
fn config_key(raw: &str) -> AppResult<&str> {
    let key = raw.trim();
    if key.is_empty() || key.len() > 255 {
        return Err(AppError::BadRequest(
            "config key must be 1-255 characters".into(),
        ));
    }
    Ok(key)
}

// ---------------------------------------------------------------------------
// PUT /workflows/{id}/config/{key}
// ---------------------------------------------------------------------------

pub async fn upsert_workflow_config(
    State(state): State<AppState>,
    Path((id, key)): Path<(DbId, String)>,
    Json(input): Json<UpsertWorkflowConfig>,
) -> AppResult<impl IntoResponse> {
    let key = config_key(&key)?;
    ensure_workflow_exists(&state, id).await?;

    let entry = WorkflowConfigRepo::upsert(&state.pool, id, key, &input).await?;
    tracing::info!(workflow_id = id, key = %entry.key, "Workflow config saved");

    Ok(Json(DataResponse { data: entry }))
}

// ---------------------------------------------------------------------------
// DELETE /workflows/{id}/config/{key}
// ---------------------------------------------------------------------------

pub async fn delete_workflow_config(
    State(state): State<AppState>,
    Path((id, key)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    let key = config_key(&key)?;
    if !WorkflowConfigRepo::delete(&state.pool, id, key).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Config entry for workflow",
            id,
        }));
    }
    tracing::info!(workflow_id = id, key = %key, "Workflow config deleted");
    Ok(StatusCode::NO_CONTENT)
}
