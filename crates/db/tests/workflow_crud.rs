//! Integration tests for workflow, config, and cascade behaviour.

use assert_matches::assert_matches;
use revdash_core::workflow::{RunOutcome, STATUS_ACTIVE, STATUS_INACTIVE};
use revdash_db::models::transaction::CreateTransaction;
use revdash_db::models::workflow::{CreateWorkflow, UpdateWorkflow};
use revdash_db::models::workflow_config::UpsertWorkflowConfig;
use revdash_db::repositories::{TransactionRepo, WorkflowConfigRepo, WorkflowRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_workflow(name: &str) -> CreateWorkflow {
    CreateWorkflow {
        name: name.to_string(),
        description: None,
        config: None,
    }
}

fn revenue(workflow_id: i64, amount: f64) -> CreateTransaction {
    CreateTransaction {
        workflow_id,
        transaction_type: "revenue".into(),
        amount,
        currency: None,
        source: "amazon".into(),
        source_id: None,
        description: None,
        metadata: None,
    }
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_starts_inactive_with_zeroed_counters(pool: PgPool) {
    let wf = WorkflowRepo::create(&pool, &new_workflow("  Amazon Affiliates  "))
        .await
        .unwrap();

    assert_eq!(wf.name, "Amazon Affiliates");
    assert_eq!(wf.status, STATUS_INACTIVE);
    assert_eq!(wf.execution_count, 0);
    assert_eq!(wf.success_rate, 0.0);
    assert_eq!(wf.avg_execution_time, 0.0);
    assert!(wf.last_run.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_only_given_fields(pool: PgPool) {
    let wf = WorkflowRepo::create(
        &pool,
        &CreateWorkflow {
            name: "Newsletter".into(),
            description: Some("weekly".into()),
            config: Some(json!({"cron": "0 9 * * 1"})),
        },
    )
    .await
    .unwrap();

    let updated = WorkflowRepo::update(
        &pool,
        wf.id,
        &UpdateWorkflow {
            status: Some(STATUS_ACTIVE.into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("workflow exists");

    assert_eq!(updated.status, STATUS_ACTIVE);
    assert_eq!(updated.description.as_deref(), Some("weekly"));
    assert_eq!(updated.config, Some(json!({"cron": "0 9 * * 1"})));

    let missing = WorkflowRepo::update(&pool, 9999, &UpdateWorkflow::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_orders_by_most_recent_update(pool: PgPool) {
    let a = WorkflowRepo::create(&pool, &new_workflow("a")).await.unwrap();
    WorkflowRepo::create(&pool, &new_workflow("b")).await.unwrap();
    WorkflowRepo::update(
        &pool,
        a.id,
        &UpdateWorkflow {
            description: Some("touched".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let list = WorkflowRepo::list(&pool).await.unwrap();
    assert_eq!(list.first().map(|w| w.id), Some(a.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn record_run_persists_rolling_stats(pool: PgPool) {
    let wf = WorkflowRepo::create(&pool, &new_workflow("runner")).await.unwrap();

    let stats = wf
        .run_stats()
        .record(RunOutcome::Succeeded, Some(10.0))
        .record(RunOutcome::Failed, Some(20.0));
    let updated = WorkflowRepo::record_run(&pool, wf.id, "error", &stats)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, "error");
    assert_eq!(updated.execution_count, 2);
    assert_eq!(updated.finished_runs, 2);
    assert_eq!(updated.success_rate, 50.0);
    assert_eq!(updated.avg_execution_time, 15.0);
    assert!(updated.last_run.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_counts_active_and_averages_success(pool: PgPool) {
    let a = WorkflowRepo::create(&pool, &new_workflow("a")).await.unwrap();
    WorkflowRepo::create(&pool, &new_workflow("b")).await.unwrap();
    sqlx::query("UPDATE workflows SET status = 'active', success_rate = 90 WHERE id = $1")
        .bind(a.id)
        .execute(&pool)
        .await
        .unwrap();

    let stats = WorkflowRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.avg_success_rate, 45.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_to_child_rows(pool: PgPool) {
    let wf = WorkflowRepo::create(&pool, &new_workflow("doomed")).await.unwrap();
    TransactionRepo::create(&pool, &revenue(wf.id, 10.0), "completed")
        .await
        .unwrap();

    assert!(WorkflowRepo::delete(&pool, wf.id).await.unwrap());
    assert!(!WorkflowRepo::delete(&pool, wf.id).await.unwrap());

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn transaction_for_missing_workflow_violates_fk(pool: PgPool) {
    let err = TransactionRepo::create(&pool, &revenue(424242, 1.0), "pending")
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn config_upsert_replaces_value(pool: PgPool) {
    let wf = WorkflowRepo::create(&pool, &new_workflow("cfg")).await.unwrap();

    let first = WorkflowConfigRepo::upsert(
        &pool,
        wf.id,
        "rate_limit",
        &UpsertWorkflowConfig {
            value: json!(100),
            description: Some("calls per minute".into()),
            is_encrypted: false,
        },
    )
    .await
    .unwrap();

    let second = WorkflowConfigRepo::upsert(
        &pool,
        wf.id,
        "rate_limit",
        &UpsertWorkflowConfig {
            value: json!(250),
            description: None,
            is_encrypted: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.value, json!(250));
    assert_eq!(second.description.as_deref(), Some("calls per minute"));

    let entries = WorkflowConfigRepo::list_for_workflow(&pool, wf.id).await.unwrap();
    assert_eq!(entries.len(), 1);

    assert!(WorkflowConfigRepo::delete(&pool, wf.id, "rate_limit").await.unwrap());
    assert!(!WorkflowConfigRepo::delete(&pool, wf.id, "rate_limit").await.unwrap());
}
