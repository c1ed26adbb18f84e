use axum::routing::{get, put};
use axum::Router;

use crate::handlers::workflows;
use crate::state::AppState;

/// Workflow routes mounted at `/workflows`.
///
/// ```text
/// GET    /                  -> list_workflows
/// POST   /                  -> create_workflow
/// GET    /stats             -> workflow_stats
/// GET    /{id}              -> get_workflow
/// PUT    /{id}              -> update_workflow
/// DELETE /{id}              -> delete_workflow
/// GET    /{id}/config       -> list_workflow_config
/// PUT    /{id}/config/{key} -> upsert_workflow_config
/// DELETE /{id}/config/{key} -> delete_workflow_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workflows::list_workflows).post(workflows::create_workflow),
        )
        .route("/stats", get(workflows::workflow_stats))
        .route(
            "/{id}",
            get(workflows::get_workflow)
                .put(workflows::update_workflow)
                .delete(workflows::delete_workflow),
        )
        .route("/{id}/config", get(workflows::list_workflow_config))
        .route(
            "/{id}/config/{key}",
            put(workflows::upsert_workflow_config).delete(workflows::delete_workflow_config),
        )
}
