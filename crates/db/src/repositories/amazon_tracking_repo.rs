//! Repository for the `amazon_tracking_ids` table.

use revdash_core::affiliate::{BEST_PERFORMING_LIMIT, TRACKING_STATUS_ACTIVE};
use revdash_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::amazon_tracking::{
    AmazonTrackingId, CreateAmazonTrackingId, UpdateTrackingPerformance,
};

const COLUMNS: &str = "\
    id, tracking_id, region, status, performance_score, total_clicks, \
    total_conversions, total_revenue::float8 AS total_revenue, \
    avg_conversion_rate::float8 AS avg_conversion_rate, last_used, usage_count, \
    metadata, created_at, updated_at";

pub struct AmazonTrackingRepo;

impl AmazonTrackingRepo {
    /// Register a tracking ID. A duplicate `tracking_id` violates
    /// `uq_amazon_tracking_ids_tracking_id`.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateAmazonTrackingId,
    ) -> Result<AmazonTrackingId, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO amazon_tracking_ids (tracking_id, region, status, metadata)
             VALUES ($1, $2, COALESCE($3, '{TRACKING_STATUS_ACTIVE}'), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AmazonTrackingId>(&query)
            .bind(input.tracking_id.trim())
            .bind(&input.region)
            .bind(&input.status)
            .bind(&input.metadata)
            .fetch_one(executor)
            .await
    }

    /// All tracking IDs, best performance score first.
    pub async fn list(pool: &PgPool) -> Result<Vec<AmazonTrackingId>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM amazon_tracking_ids ORDER BY performance_score DESC, id"
        );
        sqlx::query_as::<_, AmazonTrackingId>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply new performance figures, recompute the click conversion rate,
    /// and mark the ID as just used. Returns `None` if it does not exist.
    pub async fn update_performance<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateTrackingPerformance,
    ) -> Result<Option<AmazonTrackingId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE amazon_tracking_ids SET
                performance_score = $2,
                total_clicks = COALESCE($3, total_clicks),
                total_conversions = COALESCE($4, total_conversions),
                total_revenue = COALESCE($5, total_revenue),
                usage_count = COALESCE($6, usage_count),
                avg_conversion_rate = CASE
                    WHEN COALESCE($3, total_clicks) > 0
                    THEN ROUND(COALESCE($4, total_conversions)::numeric * 100
                               / COALESCE($3, total_clicks), 2)
                    ELSE 0
                END,
                last_used = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AmazonTrackingId>(&query)
            .bind(id)
            .bind(input.performance_score)
            .bind(input.total_clicks)
            .bind(input.total_conversions)
            .bind(input.total_revenue)
            .bind(input.usage_count)
            .fetch_optional(executor)
            .await
    }

    /// Top active tracking IDs for a region by performance score.
    pub async fn best_performing(
        pool: &PgPool,
        region: &str,
    ) -> Result<Vec<AmazonTrackingId>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM amazon_tracking_ids
             WHERE region = $1 AND status = '{TRACKING_STATUS_ACTIVE}'
             ORDER BY performance_score DESC, id
             LIMIT $2"
        );
        sqlx::query_as::<_, AmazonTrackingId>(&query)
            .bind(region)
            .bind(BEST_PERFORMING_LIMIT)
            .fetch_all(pool)
            .await
    }
}
