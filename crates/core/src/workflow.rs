//! Workflow status vocabulary and run bookkeeping.
//!
//! Workflow runners (n8n, Make) report execution status through webhooks.
//! This module maps their status strings onto the dashboard's workflow
//! status and folds finished runs into the rolling success rate and
//! average execution time stored on each workflow.

use crate::error::{validate_one_of, CoreError};
use crate::metrics::round2;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";
pub const STATUS_ERROR: &str = "error";
pub const STATUS_PROCESSING: &str = "processing";

/// All valid workflow statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_ACTIVE,
    STATUS_INACTIVE,
    STATUS_ERROR,
    STATUS_PROCESSING,
];

/// Maximum workflow name length (matches the `VARCHAR(255)` column).
pub const MAX_NAME_LENGTH: usize = 255;

/// Validate that a status string is one of the known workflow statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_STATUSES, "workflow status")
}

/// Validate a workflow name: non-blank and within the column width.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Runner status mapping
// ---------------------------------------------------------------------------

/// How a reported execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed,
    /// The runner reported a non-terminal status (queued, running, ...).
    InProgress,
}

/// Workflow status change derived from a runner's status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub workflow_status: &'static str,
    pub outcome: RunOutcome,
}

impl StatusReport {
    fn new(outcome: RunOutcome) -> Self {
        let workflow_status = match outcome {
            RunOutcome::Succeeded => STATUS_ACTIVE,
            RunOutcome::Failed => STATUS_ERROR,
            RunOutcome::InProgress => STATUS_PROCESSING,
        };
        Self {
            workflow_status,
            outcome,
        }
    }
}

/// Map an n8n execution status: `completed` / `failed` / anything else.
pub fn map_n8n_status(status: &str) -> StatusReport {
    match status {
        "completed" => StatusReport::new(RunOutcome::Succeeded),
        "failed" => StatusReport::new(RunOutcome::Failed),
        _ => StatusReport::new(RunOutcome::InProgress),
    }
}

/// Map a Make scenario status: `done` / `error` / anything else.
pub fn map_make_status(status: &str) -> StatusReport {
    match status {
        "done" => StatusReport::new(RunOutcome::Succeeded),
        "error" => StatusReport::new(RunOutcome::Failed),
        _ => StatusReport::new(RunOutcome::InProgress),
    }
}

// ---------------------------------------------------------------------------
// Rolling run statistics
// ---------------------------------------------------------------------------

/// The run counters stored on a workflow row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Status reports received (terminal or not).
    pub execution_count: i32,
    /// Runs that ended in success or failure.
    pub finished_runs: i32,
    /// Finished runs that reported a duration.
    pub timed_runs: i32,
    /// Percentage of finished runs that succeeded.
    pub success_rate: f64,
    /// Mean duration of timed runs, in seconds.
    pub avg_execution_time: f64,
}

impl RunStats {
    /// Fold one status report into the counters.
    ///
    /// `execution_count` always increments. Success rate and average
    /// duration only move for terminal outcomes, each as a running mean
    /// over the runs that contributed to it.
    pub fn record(self, outcome: RunOutcome, duration_secs: Option<f64>) -> Self {
        let mut next = Self {
            execution_count: self.execution_count.saturating_add(1),
            ..self
        };

        if outcome == RunOutcome::InProgress {
            return next;
        }

        let prior = f64::from(self.finished_runs);
        let success = if outcome == RunOutcome::Succeeded { 1.0 } else { 0.0 };
        next.finished_runs = self.finished_runs.saturating_add(1);
        next.success_rate =
            round2((self.success_rate / 100.0 * prior + success) / (prior + 1.0) * 100.0);

        if let Some(duration) = duration_secs.filter(|d| d.is_finite() && *d >= 0.0) {
            let timed = f64::from(self.timed_runs);
            next.timed_runs = self.timed_runs.saturating_add(1);
            next.avg_execution_time =
                round2((self.avg_execution_time * timed + duration) / (timed + 1.0));
        }

        next
    }
}
