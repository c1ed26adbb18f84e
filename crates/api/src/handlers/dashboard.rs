use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use revdash_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /dashboard/stats
// ---------------------------------------------------------------------------

/// Headline stat cards: revenue (all time, today, this month, UTC),
/// workflow and transaction counts, API calls and active members.
pub async fn dashboard_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = DashboardRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
