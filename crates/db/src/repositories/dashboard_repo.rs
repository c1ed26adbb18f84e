//! Cross-table aggregates for the dashboard stat cards.

use sqlx::PgPool;

use crate::models::dashboard::DashboardStats;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Gather every stat card figure in a single round trip.
    ///
    /// "Today" and "this month" start at UTC midnight and the first of the
    /// UTC month respectively.
    pub async fn stats(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
        sqlx::query_as::<_, DashboardStats>(
            "WITH bounds AS (
                SELECT
                    date_trunc('day', NOW() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC' AS day_start,
                    date_trunc('month', NOW() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC' AS month_start
             ),
             revenue AS (
                SELECT
                    COALESCE(SUM(t.amount), 0)::float8 AS total_revenue,
                    COALESCE(SUM(t.amount) FILTER (WHERE t.created_at >= b.day_start), 0)::float8
                        AS today_revenue,
                    COALESCE(SUM(t.amount) FILTER (WHERE t.created_at >= b.month_start), 0)::float8
                        AS month_revenue
                FROM transactions t CROSS JOIN bounds b
                WHERE t.status = 'completed'
             )
             SELECT
                r.total_revenue,
                r.today_revenue,
                r.month_revenue,
                (SELECT COUNT(*) FROM workflows WHERE status = 'active') AS active_workflows,
                (SELECT COUNT(*) FROM transactions) AS total_transactions,
                (SELECT COALESCE(ROUND(AVG(success_rate), 2), 0)::float8 FROM workflows)
                    AS success_rate,
                (SELECT COUNT(*) FROM api_usage) AS api_calls,
                (SELECT COUNT(*) FROM memberships WHERE status = 'active') AS active_members
             FROM revenue r",
        )
        .fetch_one(pool)
        .await
    }
}
