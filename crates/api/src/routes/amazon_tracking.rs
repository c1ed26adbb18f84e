use axum::routing::{get, put};
use axum::Router;

use crate::handlers::amazon_tracking;
use crate::state::AppState;

/// Amazon tracking ID routes mounted at `/amazon-tracking`.
///
/// ```text
/// GET  /                    -> list_tracking_ids
/// POST /                    -> create_tracking_id
/// GET  /best?region=        -> best_tracking_ids
/// PUT  /{id}/performance    -> update_tracking_performance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(amazon_tracking::list_tracking_ids).post(amazon_tracking::create_tracking_id),
        )
        .route("/best", get(amazon_tracking::best_tracking_ids))
        .route(
            "/{id}/performance",
            put(amazon_tracking::update_tracking_performance),
        )
}
