use axum::routing::{get, put};
use axum::Router;

use crate::handlers::transactions;
use crate::state::AppState;

/// Transaction routes mounted at `/transactions`.
///
/// ```text
/// GET  /                  -> list_transactions
/// POST /                  -> create_transaction
/// GET  /revenue-by-date   -> revenue_by_date
/// GET  /counts            -> transaction_counts
/// PUT  /{id}/status       -> update_transaction_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/revenue-by-date", get(transactions::revenue_by_date))
        .route("/counts", get(transactions::transaction_counts))
        .route("/{id}/status", put(transactions::update_transaction_status))
}
