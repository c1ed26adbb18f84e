//! Route definitions for inbound webhooks and the webhook event log.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::webhook_events;
use crate::state::AppState;
use crate::webhooks::{generic, pending, runner, stripe};

/// Webhook receivers mounted at `/webhooks`.
///
/// ```text
/// POST /n8n               -> receive_n8n
/// POST /make              -> receive_make
/// POST /stripe            -> receive_stripe (raw body)
/// POST /generic           -> receive_generic
/// POST /process-pending   -> process_pending
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/n8n", post(runner::receive_n8n))
        .route("/make", post(runner::receive_make))
        .route("/stripe", post(stripe::receive_stripe))
        .route("/generic", post(generic::receive_generic))
        .route("/process-pending", post(pending::process_pending))
}

/// Stored webhook events mounted at `/webhook-events`.
///
/// ```text
/// GET  /   -> list_webhook_events
/// ```
pub fn events_router() -> Router<AppState> {
    Router::new().route("/", get(webhook_events::list_webhook_events))
}
