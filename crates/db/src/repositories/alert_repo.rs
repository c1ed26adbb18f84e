//! Repository for the `alerts` table.

use revdash_core::alert::{DEFAULT_SEVERITY, STATUS_ACKNOWLEDGED, STATUS_RESOLVED};
use revdash_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::alert::{Alert, CreateAlert};

const COLUMNS: &str = "\
    id, workflow_id, alert_type, title, message, severity, status, \
    acknowledged_at, resolved_at, created_at";

pub struct AlertRepo;

impl AlertRepo {
    /// Raise a new `active` alert.
    pub async fn create<'e, E>(executor: E, input: &CreateAlert) -> Result<Alert, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO alerts (workflow_id, alert_type, title, message, severity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(input.workflow_id)
            .bind(&input.alert_type)
            .bind(&input.title)
            .bind(&input.message)
            .bind(input.severity.as_deref().unwrap_or(DEFAULT_SEVERITY))
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List alerts, newest first. Status and workflow filters combine.
    pub async fn list_filtered(
        pool: &PgPool,
        status: Option<&str>,
        workflow_id: Option<DbId>,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if workflow_id.is_some() {
            conditions.push(format!("workflow_id = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query =
            format!("SELECT {COLUMNS} FROM alerts {where_clause} ORDER BY created_at DESC, id DESC");

        let mut q = sqlx::query_as::<_, Alert>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        if let Some(wid) = workflow_id {
            q = q.bind(wid);
        }
        q.fetch_all(pool).await
    }

    /// Move an alert to `acknowledged` if it is currently in `from_status`.
    ///
    /// Returns `None` when the row is missing or its status changed in the
    /// meantime; the caller re-reads to tell those apart.
    pub async fn acknowledge(
        pool: &PgPool,
        id: DbId,
        from_status: &str,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET status = '{STATUS_ACKNOWLEDGED}', acknowledged_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(from_status)
            .fetch_optional(pool)
            .await
    }

    /// Move an alert to `resolved` if it is currently in `from_status`.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        from_status: &str,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET status = '{STATUS_RESOLVED}', resolved_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(from_status)
            .fetch_optional(pool)
            .await
    }
}
