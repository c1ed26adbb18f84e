use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Alert routes mounted at `/alerts`.
///
/// ```text
/// GET  /                    -> list_alerts
/// POST /                    -> create_alert
/// POST /{id}/acknowledge    -> acknowledge_alert
/// POST /{id}/resolve        -> resolve_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts).post(alerts::create_alert))
        .route("/{id}/acknowledge", post(alerts::acknowledge_alert))
        .route("/{id}/resolve", post(alerts::resolve_alert))
}
