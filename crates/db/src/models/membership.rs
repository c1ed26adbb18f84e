//! Paid membership entity model and DTOs.

use revdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `memberships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Membership {
    pub id: DbId,
    pub user_id: String,
    pub workflow_id: DbId,
    pub tier: String,
    pub status: String,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub auto_renew: bool,
    pub amount: f64,
    pub currency: String,
    pub stripe_subscription_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_auto_renew() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMembership {
    pub user_id: String,
    pub workflow_id: DbId,
    pub tier: String,
    pub status: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub end_date: Option<Timestamp>,
    #[serde(default = "default_auto_renew")]
    pub auto_renew: bool,
    pub stripe_subscription_id: Option<String>,
}

/// Membership counts per tier plus active members and revenue per tier.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MembershipSummary {
    pub basic: i64,
    pub pro: i64,
    pub enterprise: i64,
    pub active: i64,
    pub revenue_by_tier: Vec<TierRevenue>,
}

/// Count and active-membership revenue for one tier.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TierRevenue {
    pub tier: String,
    pub members: i64,
    pub active: i64,
    pub revenue: f64,
}
