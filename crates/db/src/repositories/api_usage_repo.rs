//! Repository for the `api_usage` table.

use revdash_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::api_usage::{ApiUsage, ApiUsageTotals, CreateApiUsage, EndpointUsage};

const COLUMNS: &str = "\
    id, workflow_id, endpoint, method, status_code, response_time, \
    request_size, response_size, success, error_message, timestamp, metadata";

pub struct ApiUsageRepo;

impl ApiUsageRepo {
    pub async fn create<'e, E>(executor: E, input: &CreateApiUsage) -> Result<ApiUsage, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO api_usage
                (workflow_id, endpoint, method, status_code, response_time,
                 request_size, response_size, success, error_message, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiUsage>(&query)
            .bind(input.workflow_id)
            .bind(&input.endpoint)
            .bind(input.method.to_ascii_uppercase())
            .bind(input.status_code)
            .bind(input.response_time)
            .bind(input.request_size)
            .bind(input.response_size)
            .bind(input.success)
            .bind(&input.error_message)
            .bind(&input.metadata)
            .fetch_one(executor)
            .await
    }

    /// List calls, newest first. Every given filter applies.
    pub async fn list_filtered(
        pool: &PgPool,
        workflow_id: Option<DbId>,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Vec<ApiUsage>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if workflow_id.is_some() {
            conditions.push(format!("workflow_id = ${param_idx}"));
            param_idx += 1;
        }
        if start.is_some() {
            conditions.push(format!("timestamp >= ${param_idx}"));
            param_idx += 1;
        }
        if end.is_some() {
            conditions.push(format!("timestamp <= ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM api_usage {where_clause} ORDER BY timestamp DESC, id DESC"
        );

        let mut q = sqlx::query_as::<_, ApiUsage>(&query);
        if let Some(wid) = workflow_id {
            q = q.bind(wid);
        }
        if let Some(s) = start {
            q = q.bind(s);
        }
        if let Some(e) = end {
            q = q.bind(e);
        }
        q.fetch_all(pool).await
    }

    /// Call count, successful calls, and mean response time (ms).
    pub async fn totals(pool: &PgPool) -> Result<ApiUsageTotals, sqlx::Error> {
        sqlx::query_as::<_, ApiUsageTotals>(
            "SELECT
                COUNT(*) AS total_calls,
                COUNT(*) FILTER (WHERE success) AS success_calls,
                COALESCE(ROUND(AVG(response_time), 2), 0)::float8 AS avg_response_time
             FROM api_usage",
        )
        .fetch_one(pool)
        .await
    }

    /// Per (endpoint, method) breakdown, busiest first.
    pub async fn by_endpoint(pool: &PgPool) -> Result<Vec<EndpointUsage>, sqlx::Error> {
        sqlx::query_as::<_, EndpointUsage>(
            "SELECT
                endpoint,
                method,
                COUNT(*) AS calls,
                COALESCE(ROUND(AVG(response_time), 2), 0)::float8 AS avg_response_time,
                ROUND(COUNT(*) FILTER (WHERE success) * 100.0 / COUNT(*), 2)::float8 AS success_rate,
                COUNT(*) FILTER (WHERE NOT success) AS errors
             FROM api_usage
             GROUP BY endpoint, method
             ORDER BY calls DESC, endpoint, method",
        )
        .fetch_all(pool)
        .await
    }
}
