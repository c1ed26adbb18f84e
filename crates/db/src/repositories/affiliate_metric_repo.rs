//! Repository for the `affiliate_metrics` table.

use revdash_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::affiliate_metric::{
    AffiliateMetric, AffiliateTotals, CreateAffiliateMetric, RegionTotals, TopPerformer,
};

const COLUMNS: &str = "\
    id, workflow_id, tracking_id, region, clicks, impressions, conversions, \
    revenue::float8 AS revenue, commission::float8 AS commission, \
    conversion_rate::float8 AS conversion_rate, performance_score, date, metadata";

/// Column sums shared by the totals and per-region queries.
const SUMS: &str = "\
    COALESCE(SUM(clicks), 0)::bigint AS clicks, \
    COALESCE(SUM(impressions), 0)::bigint AS impressions, \
    COALESCE(SUM(conversions), 0)::bigint AS conversions, \
    COALESCE(SUM(revenue), 0)::float8 AS revenue, \
    COALESCE(SUM(commission), 0)::float8 AS commission";

pub struct AffiliateMetricRepo;

impl AffiliateMetricRepo {
    /// Insert a metrics row. `region` must already be normalized and
    /// `conversion_rate` computed by the caller.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateAffiliateMetric,
        conversion_rate: f64,
    ) -> Result<AffiliateMetric, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO affiliate_metrics
                (workflow_id, tracking_id, region, clicks, impressions, conversions,
                 revenue, commission, conversion_rate, performance_score, date, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, NOW()), $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AffiliateMetric>(&query)
            .bind(input.workflow_id)
            .bind(&input.tracking_id)
            .bind(&input.region)
            .bind(input.clicks)
            .bind(input.impressions)
            .bind(input.conversions)
            .bind(input.revenue)
            .bind(input.commission)
            .bind(conversion_rate)
            .bind(input.performance_score)
            .bind(input.date)
            .bind(&input.metadata)
            .fetch_one(executor)
            .await
    }

    /// List metrics with optional workflow and region filters, newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        workflow_id: Option<DbId>,
        region: Option<&str>,
    ) -> Result<Vec<AffiliateMetric>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if workflow_id.is_some() {
            conditions.push(format!("workflow_id = ${param_idx}"));
            param_idx += 1;
        }
        if region.is_some() {
            conditions.push(format!("region = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query =
            format!("SELECT {COLUMNS} FROM affiliate_metrics {where_clause} ORDER BY date DESC, id DESC");

        let mut q = sqlx::query_as::<_, AffiliateMetric>(&query);
        if let Some(wid) = workflow_id {
            q = q.bind(wid);
        }
        if let Some(r) = region {
            q = q.bind(r);
        }
        q.fetch_all(pool).await
    }

    /// Best (tracking ID, region) pairs by total revenue.
    pub async fn top_performers(pool: &PgPool, limit: i64) -> Result<Vec<TopPerformer>, sqlx::Error> {
        sqlx::query_as::<_, TopPerformer>(
            "SELECT
                tracking_id,
                region,
                COALESCE(SUM(revenue), 0)::float8 AS total_revenue,
                COALESCE(SUM(conversions), 0)::bigint AS total_conversions,
                COALESCE(ROUND(AVG(conversion_rate), 2), 0)::float8 AS avg_conversion_rate
             FROM affiliate_metrics
             GROUP BY tracking_id, region
             ORDER BY SUM(revenue) DESC, tracking_id
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Counter totals across every row.
    pub async fn totals(pool: &PgPool) -> Result<AffiliateTotals, sqlx::Error> {
        let query = format!("SELECT {SUMS} FROM affiliate_metrics");
        sqlx::query_as::<_, AffiliateTotals>(&query)
            .fetch_one(pool)
            .await
    }

    /// Counter totals per region, highest revenue first.
    pub async fn totals_by_region(pool: &PgPool) -> Result<Vec<RegionTotals>, sqlx::Error> {
        let query = format!(
            "SELECT region, {SUMS} FROM affiliate_metrics
             GROUP BY region
             ORDER BY SUM(revenue) DESC, region"
        );
        sqlx::query_as::<_, RegionTotals>(&query)
            .fetch_all(pool)
            .await
    }
}
