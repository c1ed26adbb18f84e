//! Repository for the `workflows` table.

use revdash_core::types::DbId;
use revdash_core::workflow::RunStats;
use sqlx::{PgExecutor, PgPool};

use crate::models::workflow::{CreateWorkflow, UpdateWorkflow, Workflow, WorkflowStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, description, status, last_run, next_run, \
    execution_count, finished_runs, timed_runs, \
    success_rate::float8 AS success_rate, avg_execution_time, \
    config, created_at, updated_at";

/// Provides CRUD operations and run bookkeeping for workflows.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Insert a new workflow. It starts `inactive` with zeroed counters.
    pub async fn create<'e, E>(executor: E, input: &CreateWorkflow) -> Result<Workflow, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO workflows (name, description, config)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(&input.config)
            .fetch_one(executor)
            .await
    }

    /// Find a workflow by its ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Workflow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM workflows WHERE id = $1");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a workflow and lock its row until the surrounding transaction ends.
    ///
    /// Serializes concurrent status reports for the same workflow so the
    /// rolling statistics are not computed from a stale read.
    pub async fn find_by_id_for_update<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Workflow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM workflows WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Check whether a workflow exists without loading it.
    pub async fn exists<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM workflows WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// List all workflows, most recently updated first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Workflow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflows ORDER BY updated_at DESC, id DESC");
        sqlx::query_as::<_, Workflow>(&query).fetch_all(pool).await
    }

    /// Update a workflow. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateWorkflow,
    ) -> Result<Option<Workflow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE workflows SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                config = COALESCE($5, config)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.config)
            .fetch_optional(executor)
            .await
    }

    /// Delete a workflow and, by cascade, everything recorded against it.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflows WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a status report: new status, `last_run = NOW()`, and the
    /// updated run counters.
    pub async fn record_run<'e, E>(
        executor: E,
        id: DbId,
        status: &str,
        stats: &RunStats,
    ) -> Result<Option<Workflow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE workflows SET
                status = $2,
                last_run = NOW(),
                execution_count = $3,
                finished_runs = $4,
                timed_runs = $5,
                success_rate = $6,
                avg_execution_time = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .bind(status)
            .bind(stats.execution_count)
            .bind(stats.finished_runs)
            .bind(stats.timed_runs)
            .bind(stats.success_rate)
            .bind(stats.avg_execution_time)
            .fetch_optional(executor)
            .await
    }

    /// Total and active workflow counts plus the mean success rate.
    pub async fn stats(pool: &PgPool) -> Result<WorkflowStats, sqlx::Error> {
        sqlx::query_as::<_, WorkflowStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COALESCE(ROUND(AVG(success_rate), 2), 0)::float8 AS avg_success_rate
             FROM workflows",
        )
        .fetch_one(pool)
        .await
    }
}
