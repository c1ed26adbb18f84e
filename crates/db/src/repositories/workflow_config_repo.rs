//! Repository for the `workflow_config` table.

use revdash_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::workflow_config::{UpsertWorkflowConfig, WorkflowConfigEntry};

const COLUMNS: &str =
    "id, workflow_id, key, value, description, is_encrypted, created_at, updated_at";

pub struct WorkflowConfigRepo;

impl WorkflowConfigRepo {
    /// List a workflow's config entries ordered by key.
    pub async fn list_for_workflow(
        pool: &PgPool,
        workflow_id: DbId,
    ) -> Result<Vec<WorkflowConfigEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_config WHERE workflow_id = $1 ORDER BY key"
        );
        sqlx::query_as::<_, WorkflowConfigEntry>(&query)
            .bind(workflow_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or replace the entry for `(workflow_id, key)`.
    pub async fn upsert<'e, E>(
        executor: E,
        workflow_id: DbId,
        key: &str,
        input: &UpsertWorkflowConfig,
    ) -> Result<WorkflowConfigEntry, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO workflow_config (workflow_id, key, value, description, is_encrypted)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_workflow_config_workflow_key DO UPDATE SET
                value = EXCLUDED.value,
                description = COALESCE(EXCLUDED.description, workflow_config.description),
                is_encrypted = EXCLUDED.is_encrypted
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowConfigEntry>(&query)
            .bind(workflow_id)
            .bind(key)
            .bind(&input.value)
            .bind(&input.description)
            .bind(input.is_encrypted)
            .fetch_one(executor)
            .await
    }

    /// Delete one entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, workflow_id: DbId, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflow_config WHERE workflow_id = $1 AND key = $2")
            .bind(workflow_id)
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
