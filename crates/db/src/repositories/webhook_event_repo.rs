//! Repository for the `webhook_events` table.

use revdash_core::types::DbId;
use revdash_core::webhook::{EVENT_STATUS_PENDING, EVENT_STATUS_PROCESSED};
use sqlx::{PgExecutor, PgPool};

use crate::models::webhook_event::{NewWebhookEvent, WebhookEvent, WebhookEventFilter};

const COLUMNS: &str = "\
    id, workflow_id, source, event_type, payload, status, \
    processed_at, error_message, created_at";

pub struct WebhookEventRepo;

impl WebhookEventRepo {
    /// Record an inbound event. Events stored as `processed` are stamped
    /// with `processed_at = NOW()`.
    pub async fn create<'e, E>(executor: E, input: &NewWebhookEvent) -> Result<WebhookEvent, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO webhook_events (workflow_id, source, event_type, payload, status, processed_at)
             VALUES ($1, $2, $3, $4, $5,
                     CASE WHEN $5 = '{EVENT_STATUS_PROCESSED}' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebhookEvent>(&query)
            .bind(input.workflow_id)
            .bind(&input.source)
            .bind(&input.event_type)
            .bind(&input.payload)
            .bind(input.status)
            .fetch_one(executor)
            .await
    }

    /// List events with optional filters, newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &WebhookEventFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WebhookEvent>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.source.is_some() {
            conditions.push(format!("source = ${param_idx}"));
            param_idx += 1;
        }
        if filter.workflow_id.is_some() {
            conditions.push(format!("workflow_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM webhook_events {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, WebhookEvent>(&query);
        if let Some(s) = &filter.status {
            q = q.bind(s);
        }
        if let Some(s) = &filter.source {
            q = q.bind(s);
        }
        if let Some(wid) = filter.workflow_id {
            q = q.bind(wid);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Mark up to `batch` of the oldest pending events as processed.
    ///
    /// Rows locked by a concurrent sweep are skipped rather than waited on,
    /// so two callers never process the same event. Returns the IDs marked.
    pub async fn process_pending(pool: &PgPool, batch: i64) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(&format!(
            "UPDATE webhook_events SET status = '{EVENT_STATUS_PROCESSED}', processed_at = NOW()
             WHERE id IN (
                 SELECT id FROM webhook_events
                 WHERE status = '{EVENT_STATUS_PENDING}'
                 ORDER BY created_at, id
                 LIMIT $1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING id"
        ))
        .bind(batch)
        .fetch_all(pool)
        .await?;
        if !rows.is_empty() {
            tracing::debug!(count = rows.len(), "Marked pending webhook events processed");
        }
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Number of events still waiting to be processed.
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM webhook_events WHERE status = '{EVENT_STATUS_PENDING}'"
        ))
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
