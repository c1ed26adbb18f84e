use axum::extract::State;
use axum::{routing::get, Json, Router};
use revdash_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub websocket_clients: usize,
    pub timestamp: Timestamp,
}

/// Always 200 so load balancers can tell "up but degraded" from "down".
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match revdash_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        websocket_clients: state.ws_manager.connection_count().await,
        timestamp: chrono::Utc::now(),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
