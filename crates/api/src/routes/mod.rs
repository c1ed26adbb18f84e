pub mod affiliate_metrics;
pub mod alerts;
pub mod amazon_tracking;
pub mod api_usage;
pub mod dashboard;
pub mod health;
pub mod memberships;
pub mod realtime;
pub mod transactions;
pub mod webhooks;
pub mod workflows;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                      WebSocket
///
/// /workflows                               list, create
/// /workflows/stats                         aggregate stats
/// /workflows/{id}                          get, update, delete
/// /workflows/{id}/config                   list config entries
/// /workflows/{id}/config/{key}             upsert, delete entry
///
/// /dashboard/stats                         headline numbers
///
/// /transactions                            list (sort, paging), create
/// /transactions/revenue-by-date            daily revenue series
/// /transactions/counts                     counts per type
/// /transactions/{id}/status                set status (PUT)
///
/// /affiliate-metrics                       list, create
/// /affiliate-metrics/top-performers        best tracking IDs
/// /affiliate-metrics/summary               totals and per-region rollup
///
/// /api-usage                               list, record
/// /api-usage/summary                       totals
/// /api-usage/endpoints                     per endpoint rollup
///
/// /memberships                             list, create
/// /memberships/summary                     tier counts and MRR
///
/// /alerts                                  list, create
/// /alerts/{id}/acknowledge                 acknowledge (POST)
/// /alerts/{id}/resolve                     resolve (POST)
///
/// /amazon-tracking                         list, create
/// /amazon-tracking/best                    top IDs per region
/// /amazon-tracking/{id}/performance        update performance (PUT)
///
/// /realtime/metrics                        list latest, record
///
/// /webhook-events                          stored event log
///
/// /webhooks/n8n                            n8n execution report
/// /webhooks/make                           Make scenario report
/// /webhooks/stripe                         Stripe events (signed)
/// /webhooks/generic                        any other source
/// /webhooks/process-pending                drain pending events
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        .nest("/workflows", workflows::router())
        .nest("/dashboard", dashboard::router())
        .nest("/transactions", transactions::router())
        .nest("/affiliate-metrics", affiliate_metrics::router())
        .nest("/api-usage", api_usage::router())
        .nest("/memberships", memberships::router())
        .nest("/alerts", alerts::router())
        .nest("/amazon-tracking", amazon_tracking::router())
        .nest("/realtime", realtime::router())
        // Stored events and the receivers that produce them.
        .nest("/webhook-events", webhooks::events_router())
        .nest("/webhooks", webhooks::router())
}
