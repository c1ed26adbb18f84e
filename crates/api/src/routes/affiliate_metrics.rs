use axum::routing::get;
use axum::Router;

use crate::handlers::affiliate_metrics;
use crate::state::AppState;

/// Affiliate metric routes mounted at `/affiliate-metrics`.
///
/// ```text
/// GET  /                 -> list_affiliate_metrics
/// POST /                 -> create_affiliate_metric
/// GET  /top-performers   -> top_performers
/// GET  /summary          -> affiliate_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(affiliate_metrics::list_affiliate_metrics)
                .post(affiliate_metrics::create_affiliate_metric),
        )
        .route("/top-performers", get(affiliate_metrics::top_performers))
        .route("/summary", get(affiliate_metrics::affiliate_summary))
}
