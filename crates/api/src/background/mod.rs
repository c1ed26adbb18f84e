//! Periodic maintenance jobs that run beside the HTTP server.
//!
//! [`BackgroundTasks`] owns every spawned job together with its
//! [`CancellationToken`] so shutdown can stop them as a group.

pub mod metrics_retention;
pub mod webhook_sweeper;

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Spawned jobs, stopped in spawn order on shutdown.
#[derive(Default)]
pub struct BackgroundTasks {
    tasks: Vec<(&'static str, CancellationToken, JoinHandle<()>)>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `job` with a fresh cancellation token.
    pub fn spawn<F, Fut>(&mut self, name: &'static str, job: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(job(cancel.clone()));
        self.tasks.push((name, cancel, handle));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancel every job and wait up to `grace` for each to return.
    pub async fn shutdown(self, grace: Duration) {
        for (name, cancel, handle) in self.tasks {
            cancel.cancel();
            if tokio::time::timeout(grace, handle).await.is_err() {
                tracing::warn!(task = name, "Background task did not stop in time");
            }
        }
    }
}

/// Call `tick` once per `period` until `cancel` fires.
///
/// The first call happens one full period after start. A slow tick delays
/// the next one rather than triggering a burst.
pub async fn run_every<F, Fut>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut tick: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tracing::info!(task = name, period_secs = period.as_secs_f64(), "Background task started");

    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => tick().await,
        }
    }

    tracing::info!(task = name, "Background task stopped");
}
