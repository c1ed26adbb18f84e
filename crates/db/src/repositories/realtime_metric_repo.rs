//! Repository for the `real_time_metrics` table.

use revdash_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::realtime_metric::{CreateRealTimeMetric, RealTimeMetric};

const COLUMNS: &str =
    "id, workflow_id, metric_type, value::float8 AS value, unit, timestamp, metadata";

pub struct RealTimeMetricRepo;

impl RealTimeMetricRepo {
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateRealTimeMetric,
    ) -> Result<RealTimeMetric, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO real_time_metrics (workflow_id, metric_type, value, unit, metadata)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RealTimeMetric>(&query)
            .bind(input.workflow_id)
            .bind(&input.metric_type)
            .bind(input.value)
            .bind(&input.unit)
            .bind(&input.metadata)
            .fetch_one(executor)
            .await
    }

    /// Latest metrics, newest first. Workflow and type filters combine.
    pub async fn list_latest(
        pool: &PgPool,
        workflow_id: Option<DbId>,
        metric_type: Option<&str>,
        limit: i64,
    ) -> Result<Vec<RealTimeMetric>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if workflow_id.is_some() {
            conditions.push(format!("workflow_id = ${param_idx}"));
            param_idx += 1;
        }
        if metric_type.is_some() {
            conditions.push(format!("metric_type = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM real_time_metrics {where_clause} \
             ORDER BY timestamp DESC, id DESC LIMIT ${param_idx}"
        );

        let mut q = sqlx::query_as::<_, RealTimeMetric>(&query);
        if let Some(wid) = workflow_id {
            q = q.bind(wid);
        }
        if let Some(t) = metric_type {
            q = q.bind(t);
        }
        q.bind(limit).fetch_all(pool).await
    }

    /// Delete metrics older than `retention_hours`. Returns rows removed.
    pub async fn delete_older_than(pool: &PgPool, retention_hours: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM real_time_metrics WHERE timestamp < NOW() - make_interval(hours => $1::int)",
        )
        .bind(retention_hours)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
