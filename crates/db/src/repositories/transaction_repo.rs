//! Repository for the `transactions` table.

use revdash_core::transaction::{TransactionSort, DEFAULT_CURRENCY};
use revdash_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::transaction::{
    CreateTransaction, DailyRevenueRow, Transaction, TransactionCounts,
};

/// Column list for `transactions` queries.
const COLUMNS: &str = "\
    id, workflow_id, transaction_type, amount::float8 AS amount, currency, \
    status, source, source_id, description, metadata, created_at, updated_at";

const INSERT_COLUMNS: &str = "\
    workflow_id, transaction_type, amount, currency, status, \
    source, source_id, description, metadata";

/// Provides CRUD and aggregate queries for transactions.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Insert a transaction with the given status.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateTransaction,
        status: &str,
    ) -> Result<Transaction, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO transactions ({INSERT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.workflow_id)
            .bind(&input.transaction_type)
            .bind(input.amount)
            .bind(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
            .bind(status)
            .bind(&input.source)
            .bind(&input.source_id)
            .bind(&input.description)
            .bind(&input.metadata)
            .fetch_one(executor)
            .await
    }

    /// Insert unless a transaction with the same `(source, source_id)`
    /// already exists. Returns `None` for a duplicate.
    pub async fn create_if_absent<'e, E>(
        executor: E,
        input: &CreateTransaction,
        status: &str,
    ) -> Result<Option<Transaction>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO transactions ({INSERT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (source, source_id) WHERE source_id IS NOT NULL DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.workflow_id)
            .bind(&input.transaction_type)
            .bind(input.amount)
            .bind(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
            .bind(status)
            .bind(&input.source)
            .bind(&input.source_id)
            .bind(&input.description)
            .bind(&input.metadata)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a page of transactions, optionally for one workflow.
    pub async fn list(
        pool: &PgPool,
        workflow_id: Option<DbId>,
        sort: TransactionSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let mut param_idx: usize = 1;
        let where_clause = if workflow_id.is_some() {
            param_idx += 1;
            "WHERE workflow_id = $1"
        } else {
            ""
        };

        let query = format!(
            "SELECT {COLUMNS} FROM transactions {where_clause} \
             ORDER BY {} \
             LIMIT ${param_idx} OFFSET ${}",
            sort.order_by(),
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Transaction>(&query);
        if let Some(wid) = workflow_id {
            q = q.bind(wid);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Set a transaction's status. Returns `None` if it does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query =
            format!("UPDATE transactions SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Completed transactions in `[start, end]`, summed per UTC day, ascending.
    pub async fn revenue_by_day(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<DailyRevenueRow>, sqlx::Error> {
        sqlx::query_as::<_, DailyRevenueRow>(
            "SELECT
                (created_at AT TIME ZONE 'UTC')::date AS day,
                COALESCE(SUM(amount), 0)::float8 AS revenue,
                COUNT(*) AS transactions,
                COUNT(DISTINCT workflow_id) AS workflows
             FROM transactions
             WHERE status = 'completed' AND created_at >= $1 AND created_at <= $2
             GROUP BY day
             ORDER BY day",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Number of transactions per type and in total.
    pub async fn counts(pool: &PgPool) -> Result<TransactionCounts, sqlx::Error> {
        sqlx::query_as::<_, TransactionCounts>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE transaction_type = 'revenue') AS revenue,
                COUNT(*) FILTER (WHERE transaction_type = 'expense') AS expense,
                COUNT(*) FILTER (WHERE transaction_type = 'commission') AS commission,
                COUNT(*) FILTER (WHERE transaction_type = 'refund') AS refund
             FROM transactions",
        )
        .fetch_one(pool)
        .await
    }
}
