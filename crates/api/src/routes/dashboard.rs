use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes mounted at `/dashboard`.
///
/// ```text
/// GET  /stats   -> dashboard_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(dashboard::dashboard_stats))
}
