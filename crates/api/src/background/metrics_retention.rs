//! Purges `real_time_metrics` rows older than the retention window.

use std::time::Duration;

use revdash_db::repositories::RealTimeMetricRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::run_every;

const PURGE_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Only spawned when `retention_hours` is positive.
pub async fn run(pool: PgPool, retention_hours: i64, cancel: CancellationToken) {
    tracing::debug!(retention_hours, "Metrics retention configured");
    run_every("metrics retention", PURGE_PERIOD, cancel, || {
        purge(&pool, retention_hours)
    })
    .await;
}

async fn purge(pool: &PgPool, retention_hours: i64) {
    match RealTimeMetricRepo::delete_older_than(pool, retention_hours).await {
        Ok(0) => tracing::debug!("No expired real-time metrics"),
        Ok(deleted) => tracing::info!(deleted, retention_hours, "Purged expired real-time metrics"),
        Err(e) => tracing::error!(error = %e, "Real-time metrics purge failed"),
    }
}
