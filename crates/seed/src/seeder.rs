//! Writes the demo data set inside a single transaction.

use std::fmt;

use anyhow::Context;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use revdash_core::affiliate;
use revdash_core::alert::{SEVERITY_HIGH, SEVERITY_LOW, TYPE_ERROR, TYPE_SUCCESS};
use revdash_core::membership::{STATUS_ACTIVE, STATUS_CANCELLED, STATUS_EXPIRED};
use revdash_core::transaction;
use revdash_core::types::DbId;
use revdash_core::workflow::{RunStats, STATUS_ACTIVE as WORKFLOW_ACTIVE};
use revdash_db::models::affiliate_metric::CreateAffiliateMetric;
use revdash_db::models::alert::CreateAlert;
use revdash_db::models::amazon_tracking::{CreateAmazonTrackingId, UpdateTrackingPerformance};
use revdash_db::models::api_usage::CreateApiUsage;
use revdash_db::models::membership::CreateMembership;
use revdash_db::models::transaction::CreateTransaction;
use revdash_db::models::workflow::CreateWorkflow;
use revdash_db::models::workflow_config::UpsertWorkflowConfig;
use revdash_db::repositories::{
    AffiliateMetricRepo, AlertRepo, AmazonTrackingRepo, ApiUsageRepo, MembershipRepo,
    TransactionRepo, WorkflowConfigRepo, WorkflowRepo,
};
use revdash_db::DbPool;
use serde_json::json;
use sqlx::{PgConnection, Postgres, Transaction};

use crate::fixtures::{
    self, ORCHESTRATOR_NAME, SERVICES, TIER_PRICES, TRACKING_IDS, TRANSACTION_KINDS,
};

/// Every table the seed writes to, children before parents.
const SEEDED_TABLES: &[&str] = &[
    "real_time_metrics",
    "alerts",
    "webhook_events",
    "api_usage",
    "memberships",
    "affiliate_metrics",
    "amazon_tracking_ids",
    "transactions",
    "workflow_config",
    "workflows",
];

#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    /// Truncate the seeded tables before inserting.
    pub reset: bool,
    /// Fixed RNG seed for reproducible data.
    pub rng_seed: Option<u64>,
}

/// Row counts written by one seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub workflows: usize,
    pub config_entries: usize,
    pub tracking_ids: usize,
    pub transactions: usize,
    pub affiliate_metrics: usize,
    pub api_usage: usize,
    pub memberships: usize,
    pub alerts: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seed summary:")?;
        writeln!(f, "  {:>4} workflows", self.workflows)?;
        writeln!(f, "  {:>4} workflow config entries", self.config_entries)?;
        writeln!(f, "  {:>4} Amazon tracking IDs", self.tracking_ids)?;
        writeln!(f, "  {:>4} transactions", self.transactions)?;
        writeln!(f, "  {:>4} affiliate metrics", self.affiliate_metrics)?;
        writeln!(f, "  {:>4} API usage records", self.api_usage)?;
        writeln!(f, "  {:>4} memberships", self.memberships)?;
        write!(f, "  {:>4} alerts", self.alerts)
    }
}

/// Seed the database. Nothing is written unless every step succeeds.
pub async fn run(pool: &DbPool, options: &SeedOptions) -> anyhow::Result<SeedSummary> {
    let mut rng = match options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut tx: Transaction<'_, Postgres> = pool.begin().await?;

    if options.reset {
        reset(&mut tx).await.context("failed to truncate tables")?;
        tracing::info!(tables = SEEDED_TABLES.len(), "Existing data truncated");
    }

    let mut summary = SeedSummary::default();

    let workflow_ids = seed_workflows(&mut tx, &mut summary)
        .await
        .context("failed to seed workflows")?;
    seed_tracking_ids(&mut tx, &mut summary)
        .await
        .context("failed to seed tracking IDs")?;
    seed_transactions(&mut tx, &mut rng, &workflow_ids, &mut summary)
        .await
        .context("failed to seed transactions")?;
    seed_affiliate_metrics(&mut tx, &mut rng, workflow_ids[0], &mut summary)
        .await
        .context("failed to seed affiliate metrics")?;
    seed_api_usage(&mut tx, &mut rng, &workflow_ids, &mut summary)
        .await
        .context("failed to seed API usage")?;
    seed_memberships(&mut tx, &mut rng, workflow_ids[5], &mut summary)
        .await
        .context("failed to seed memberships")?;
    seed_alerts(&mut tx, workflow_ids[0], &mut summary)
        .await
        .context("failed to seed alerts")?;

    tx.commit().await?;
    Ok(summary)
}

async fn reset(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    let query = format!(
        "TRUNCATE {} RESTART IDENTITY CASCADE",
        SEEDED_TABLES.join(", ")
    );
    sqlx::query(&query).execute(conn).await?;
    Ok(())
}

/// Returns the new workflow ids in fixture order.
async fn seed_workflows(
    conn: &mut PgConnection,
    summary: &mut SeedSummary,
) -> Result<Vec<DbId>, sqlx::Error> {
    let catalogue = fixtures::workflows();
    let managed: Vec<&str> = catalogue
        .iter()
        .map(|w| w.name)
        .filter(|name| *name != ORCHESTRATOR_NAME)
        .collect();

    let mut ids = Vec::with_capacity(catalogue.len());
    let mut managed_ids = Vec::with_capacity(managed.len());
    let mut orchestrator_id = None;

    for fixture in &catalogue {
        let mut config = (fixture.config)();
        if fixture.name == ORCHESTRATOR_NAME {
            config["workflows"] = json!(managed);
        }
        let workflow = WorkflowRepo::create(
            &mut *conn,
            &CreateWorkflow {
                name: fixture.name.to_string(),
                description: Some(fixture.description.to_string()),
                config: Some(config),
            },
        )
        .await?;

        let stats = RunStats {
            execution_count: fixture.total_runs,
            finished_runs: fixture.total_runs,
            timed_runs: 0,
            success_rate: fixture.success_rate,
            avg_execution_time: 0.0,
        };
        WorkflowRepo::record_run(&mut *conn, workflow.id, WORKFLOW_ACTIVE, &stats).await?;

        if fixture.name == ORCHESTRATOR_NAME {
            orchestrator_id = Some(workflow.id);
        } else {
            managed_ids.push(workflow.id);
        }
        ids.push(workflow.id);
    }

    if let Some(id) = orchestrator_id {
        let entries = [
            (
                "scheduling",
                fixtures::orchestrator_scheduling(),
                "Peak hours used when dispatching managed workflows",
            ),
            (
                "managed_workflows",
                json!(managed_ids),
                "Workflow ids coordinated by the orchestrator",
            ),
        ];
        for (key, value, description) in entries {
            WorkflowConfigRepo::upsert(
                &mut *conn,
                id,
                key,
                &UpsertWorkflowConfig {
                    value,
                    description: Some(description.to_string()),
                    is_encrypted: false,
                },
            )
            .await?;
            summary.config_entries += 1;
        }
    }

    summary.workflows = ids.len();
    tracing::info!(count = ids.len(), "Seeded workflows");
    Ok(ids)
}

async fn seed_tracking_ids(
    conn: &mut PgConnection,
    summary: &mut SeedSummary,
) -> Result<(), sqlx::Error> {
    for fixture in &TRACKING_IDS {
        let created = AmazonTrackingRepo::create(
            &mut *conn,
            &CreateAmazonTrackingId {
                tracking_id: fixture.tag.to_string(),
                region: fixture.region.to_string(),
                status: None,
                metadata: Some(json!({ "marketplace": fixture.region })),
            },
        )
        .await?;
        AmazonTrackingRepo::update_performance(
            &mut *conn,
            created.id,
            &UpdateTrackingPerformance {
                performance_score: fixture.performance_score,
                total_clicks: Some(fixture.clicks),
                total_conversions: Some(fixture.conversions),
                total_revenue: Some(fixture.revenue),
                usage_count: Some(fixture.conversions),
            },
        )
        .await?;
        summary.tracking_ids += 1;
    }
    tracing::info!(count = summary.tracking_ids, "Seeded Amazon tracking IDs");
    Ok(())
}

/// Random transactions over the last 30 days, spread across every workflow
/// except the orchestrator.
async fn seed_transactions(
    conn: &mut PgConnection,
    rng: &mut StdRng,
    workflow_ids: &[DbId],
    summary: &mut SeedSummary,
) -> Result<(), sqlx::Error> {
    let earners = &workflow_ids[..workflow_ids.len() - 1];

    for i in 0..fixtures::TRANSACTION_COUNT {
        let kind = &TRANSACTION_KINDS[rng.random_range(0..TRANSACTION_KINDS.len())];
        let statuses = transaction::VALID_STATUSES;
        let status = statuses[rng.random_range(0..statuses.len())];
        let workflow_id = earners[rng.random_range(0..earners.len())];
        let amount = round2(kind.min + rng.random::<f64>() * kind.span);

        let created = TransactionRepo::create(
            &mut *conn,
            &CreateTransaction {
                workflow_id,
                transaction_type: kind.transaction_type.to_string(),
                amount,
                currency: None,
                source: kind.source.to_string(),
                source_id: Some(format!("seed-{i:03}")),
                description: Some(kind.label.replace('_', " ")),
                metadata: Some(json!({
                    "kind": kind.label,
                    "source": "automation_ecosystem",
                    "workflow_version": "2025.1.0",
                })),
            },
            status,
        )
        .await?;

        let age_minutes = rng.random_range(0..fixtures::METRIC_DAYS * 24 * 60);
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        sqlx::query("UPDATE transactions SET created_at = $2 WHERE id = $1")
            .bind(created.id)
            .bind(created_at)
            .execute(&mut *conn)
            .await?;
        summary.transactions += 1;
    }
    tracing::info!(count = summary.transactions, "Seeded transactions");
    Ok(())
}

/// One row per region per day for the last 30 days.
async fn seed_affiliate_metrics(
    conn: &mut PgConnection,
    rng: &mut StdRng,
    workflow_id: DbId,
    summary: &mut SeedSummary,
) -> Result<(), sqlx::Error> {
    let today = Utc::now();
    for day in 0..fixtures::METRIC_DAYS {
        let date = today - Duration::days(day);
        for fixture in &TRACKING_IDS {
            let clicks: i32 = rng.random_range(100..600);
            let impressions = clicks * rng.random_range(3..9);
            let conversions: i32 = rng.random_range(10..60);
            let input = CreateAffiliateMetric {
                workflow_id,
                tracking_id: fixture.tag.to_string(),
                region: fixture.region.to_string(),
                clicks,
                impressions,
                conversions,
                revenue: round2(rng.random_range(100.0..1100.0)),
                commission: round2(rng.random_range(10.0..110.0)),
                performance_score: rng.random_range(60..=100),
                date: Some(date),
                metadata: None,
            };
            let rate = affiliate::conversion_rate(i64::from(conversions), i64::from(impressions));
            AffiliateMetricRepo::create(&mut *conn, &input, rate).await?;
            summary.affiliate_metrics += 1;
        }
    }
    tracing::info!(count = summary.affiliate_metrics, "Seeded affiliate metrics");
    Ok(())
}

/// Per-call usage rows for each external service, about 2% failing.
async fn seed_api_usage(
    conn: &mut PgConnection,
    rng: &mut StdRng,
    workflow_ids: &[DbId],
    summary: &mut SeedSummary,
) -> Result<(), sqlx::Error> {
    for service in &SERVICES {
        let workflow_id = workflow_ids[service.workflow_index];
        for _ in 0..fixtures::CALLS_PER_SERVICE {
            let success = rng.random_bool(0.98);
            let jitter = rng.random_range(0..service.base_latency_ms / 2 + 1);
            ApiUsageRepo::create(
                &mut *conn,
                &CreateApiUsage {
                    workflow_id,
                    endpoint: service.endpoint.to_string(),
                    method: service.method.to_string(),
                    status_code: Some(if success { 200 } else { 429 }),
                    response_time: Some(service.base_latency_ms + jitter),
                    request_size: Some(rng.random_range(200..4_000)),
                    response_size: Some(rng.random_range(500..20_000)),
                    success,
                    error_message: (!success).then(|| "Rate limit exceeded".to_string()),
                    metadata: Some(json!({ "service": service.name })),
                },
            )
            .await?;
            summary.api_usage += 1;
        }
    }
    tracing::info!(count = summary.api_usage, "Seeded API usage");
    Ok(())
}

async fn seed_memberships(
    conn: &mut PgConnection,
    rng: &mut StdRng,
    workflow_id: DbId,
    summary: &mut SeedSummary,
) -> Result<(), sqlx::Error> {
    for i in 0..fixtures::MEMBERSHIP_COUNT {
        let (tier, amount) = TIER_PRICES[i % TIER_PRICES.len()];
        let status = match rng.random_range(0..10) {
            0 => STATUS_CANCELLED,
            1 => STATUS_EXPIRED,
            _ => STATUS_ACTIVE,
        };
        let end_date = (status != STATUS_ACTIVE)
            .then(|| Utc::now() - Duration::days(rng.random_range(1..30)));

        MembershipRepo::create(
            &mut *conn,
            &CreateMembership {
                user_id: format!("user_{:03}", i + 1),
                workflow_id,
                tier: tier.to_string(),
                status: Some(status.to_string()),
                amount,
                currency: None,
                end_date,
                auto_renew: status == STATUS_ACTIVE,
                stripe_subscription_id: Some(format!("sub_seed_{:03}", i + 1)),
            },
        )
        .await?;
        summary.memberships += 1;
    }
    tracing::info!(count = summary.memberships, "Seeded memberships");
    Ok(())
}

async fn seed_alerts(
    conn: &mut PgConnection,
    workflow_id: DbId,
    summary: &mut SeedSummary,
) -> Result<(), sqlx::Error> {
    let alerts = [
        CreateAlert {
            workflow_id: Some(workflow_id),
            alert_type: TYPE_ERROR.to_string(),
            title: "Amazon Influencer Workflow Failed".to_string(),
            message: "Workflow execution failed due to API rate limit".to_string(),
            severity: Some(SEVERITY_HIGH.to_string()),
        },
        CreateAlert {
            workflow_id: None,
            alert_type: TYPE_SUCCESS.to_string(),
            title: "Monthly Revenue Target Achieved".to_string(),
            message: "You have reached 110% of your monthly revenue target".to_string(),
            severity: Some(SEVERITY_LOW.to_string()),
        },
    ];
    for alert in &alerts {
        AlertRepo::create(&mut *conn, alert).await?;
        summary.alerts += 1;
    }
    tracing::info!(count = summary.alerts, "Seeded alerts");
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
