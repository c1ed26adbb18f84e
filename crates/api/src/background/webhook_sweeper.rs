//! Processes pending webhook events on a timer, the same work
//! `POST /webhooks/process-pending` does on demand.

use std::sync::Arc;
use std::time::Duration;

use revdash_events::EventBus;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::run_every;
use crate::webhooks::pending::process_pending_batch;

/// Only spawned when `interval_secs` is positive.
pub async fn run(
    pool: PgPool,
    event_bus: Arc<EventBus>,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    run_every("webhook sweeper", Duration::from_secs(interval_secs), cancel, || {
        sweep(&pool, &event_bus)
    })
    .await;
}

async fn sweep(pool: &PgPool, event_bus: &EventBus) {
    match process_pending_batch(pool, event_bus).await {
        Ok(0) => tracing::debug!("No pending webhook events"),
        Ok(processed) => tracing::info!(processed, "Swept pending webhook events"),
        Err(e) => tracing::error!(error = %e, "Webhook sweep failed"),
    }
}
