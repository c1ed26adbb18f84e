//! Dashboard stat card figures.

use serde::Serialize;
use sqlx::FromRow;

/// Headline numbers for the dashboard stat cards.
///
/// Revenue figures count `completed` transactions only.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub today_revenue: f64,
    pub month_revenue: f64,
    pub active_workflows: i64,
    pub total_transactions: i64,
    /// Mean of workflow success rates.
    pub success_rate: f64,
    pub api_calls: i64,
    pub active_members: i64,
}
