use axum::routing::get;
use axum::Router;

use crate::handlers::api_usage;
use crate::state::AppState;

/// API usage routes mounted at `/api-usage`.
///
/// ```text
/// GET  /            -> list_api_usage
/// POST /            -> record_api_usage
/// GET  /summary     -> api_usage_summary
/// GET  /endpoints   -> api_usage_by_endpoint
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(api_usage::list_api_usage).post(api_usage::record_api_usage),
        )
        .route("/summary", get(api_usage::api_usage_summary))
        .route("/endpoints", get(api_usage::api_usage_by_endpoint))
}
