use axum::routing::get;
use axum::Router;

use crate::handlers::memberships;
use crate::state::AppState;

/// Membership routes mounted at `/memberships`.
///
/// ```text
/// GET  /          -> list_memberships
/// POST /          -> create_membership
/// GET  /summary   -> membership_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(memberships::list_memberships).post(memberships::create_membership),
        )
        .route("/summary", get(memberships::membership_summary))
}
