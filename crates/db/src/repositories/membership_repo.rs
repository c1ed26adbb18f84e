//! Repository for the `memberships` table.

use revdash_core::membership::{STATUS_ACTIVE, TIER_BASIC, TIER_ENTERPRISE, TIER_PRO};
use revdash_core::transaction::DEFAULT_CURRENCY;
use sqlx::{PgExecutor, PgPool};

use crate::models::membership::{CreateMembership, Membership, MembershipSummary, TierRevenue};

const COLUMNS: &str = "\
    id, user_id, workflow_id, tier, status, start_date, end_date, auto_renew, \
    amount::float8 AS amount, currency, stripe_subscription_id, created_at, updated_at";

pub struct MembershipRepo;

impl MembershipRepo {
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateMembership,
    ) -> Result<Membership, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO memberships
                (user_id, workflow_id, tier, status, amount, currency,
                 end_date, auto_renew, stripe_subscription_id)
             VALUES ($1, $2, $3, COALESCE($4, '{STATUS_ACTIVE}'), $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(&input.user_id)
            .bind(input.workflow_id)
            .bind(&input.tier)
            .bind(&input.status)
            .bind(input.amount)
            .bind(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
            .bind(input.end_date)
            .bind(input.auto_renew)
            .bind(&input.stripe_subscription_id)
            .fetch_one(executor)
            .await
    }

    /// All memberships, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Membership>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM memberships ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Membership>(&query).fetch_all(pool).await
    }

    /// Set the status of every membership tied to a Stripe subscription.
    ///
    /// Returns the number of memberships changed. Cancelling also stamps
    /// `end_date` if it was open.
    pub async fn set_status_by_subscription<'e, E>(
        executor: E,
        stripe_subscription_id: &str,
        status: &str,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE memberships SET
                status = $2,
                end_date = CASE WHEN $2 <> 'active' THEN COALESCE(end_date, NOW()) ELSE end_date END
             WHERE stripe_subscription_id = $1 AND status <> $2",
        )
        .bind(stripe_subscription_id)
        .bind(status)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Counts per tier, active members, and active revenue per tier.
    pub async fn summary(pool: &PgPool) -> Result<MembershipSummary, sqlx::Error> {
        let rows = sqlx::query_as::<_, TierRevenue>(
            "SELECT
                tier,
                COUNT(*) AS members,
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COALESCE(SUM(amount) FILTER (WHERE status = 'active'), 0)::float8 AS revenue
             FROM memberships
             GROUP BY tier
             ORDER BY tier",
        )
        .fetch_all(pool)
        .await?;

        let mut summary = MembershipSummary::default();
        for row in &rows {
            match row.tier.as_str() {
                TIER_BASIC => summary.basic = row.members,
                TIER_PRO => summary.pro = row.members,
                TIER_ENTERPRISE => summary.enterprise = row.members,
                _ => {}
            }
            summary.active += row.active;
        }
        summary.revenue_by_tier = rows;
        Ok(summary)
    }
}
