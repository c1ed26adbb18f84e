use axum::routing::get;
use axum::Router;

use crate::handlers::realtime;
use crate::state::AppState;

/// Real-time metric routes mounted at `/realtime`.
///
/// ```text
/// GET  /metrics   -> list_metrics
/// POST /metrics   -> record_metric
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/metrics",
        get(realtime::list_metrics).post(realtime::record_metric),
    )
}
