//! Workflow entity model and DTOs.

use revdash_core::types::{DbId, Timestamp};
use revdash_core::workflow::RunStats;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workflows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workflow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub last_run: Option<Timestamp>,
    pub next_run: Option<Timestamp>,
    pub execution_count: i32,
    pub finished_runs: i32,
    pub timed_runs: i32,
    pub success_rate: f64,
    /// Seconds.
    pub avg_execution_time: f64,
    pub config: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Workflow {
    /// The rolling run counters, for folding in a new status report.
    pub fn run_stats(&self) -> RunStats {
        RunStats {
            execution_count: self.execution_count,
            finished_runs: self.finished_runs,
            timed_runs: self.timed_runs,
            success_rate: self.success_rate,
            avg_execution_time: self.avg_execution_time,
        }
    }
}

/// DTO for creating a new workflow. New workflows start `inactive`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
}

/// DTO for updating an existing workflow. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkflow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub config: Option<serde_json::Value>,
}

/// Headline workflow counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowStats {
    pub total: i64,
    pub active: i64,
    pub avg_success_rate: f64,
}
