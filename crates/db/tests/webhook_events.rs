//! Integration tests for the webhook event log and alerts.

use revdash_core::webhook::{EVENT_STATUS_PENDING, EVENT_STATUS_PROCESSED};
use revdash_db::models::alert::CreateAlert;
use revdash_db::models::realtime_metric::CreateRealTimeMetric;
use revdash_db::models::webhook_event::{NewWebhookEvent, WebhookEventFilter};
use revdash_db::models::workflow::CreateWorkflow;
use revdash_db::repositories::{AlertRepo, RealTimeMetricRepo, WebhookEventRepo, WorkflowRepo};
use serde_json::json;
use sqlx::PgPool;

async fn workflow(pool: &PgPool) -> i64 {
    WorkflowRepo::create(
        pool,
        &CreateWorkflow {
            name: "hooks".into(),
            description: None,
            config: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn event(workflow_id: i64, source: &str, status: &'static str) -> NewWebhookEvent {
    NewWebhookEvent {
        workflow_id,
        source: source.into(),
        event_type: "execution".into(),
        payload: json!({"ok": true}),
        status,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn processed_events_are_stamped(pool: PgPool) {
    let w = workflow(&pool).await;
    let pending = WebhookEventRepo::create(&pool, &event(w, "n8n", EVENT_STATUS_PENDING))
        .await
        .unwrap();
    let processed = WebhookEventRepo::create(&pool, &event(w, "stripe", EVENT_STATUS_PROCESSED))
        .await
        .unwrap();

    assert!(pending.processed_at.is_none());
    assert!(processed.processed_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn process_pending_marks_oldest_batch(pool: PgPool) {
    let w = workflow(&pool).await;
    for _ in 0..3 {
        WebhookEventRepo::create(&pool, &event(w, "make", EVENT_STATUS_PENDING))
            .await
            .unwrap();
    }

    let first = WebhookEventRepo::process_pending(&pool, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(WebhookEventRepo::count_pending(&pool).await.unwrap(), 1);

    let second = WebhookEventRepo::process_pending(&pool, 100).await.unwrap();
    assert_eq!(second.len(), 1);
    assert!(WebhookEventRepo::process_pending(&pool, 100).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_source_and_status(pool: PgPool) {
    let w = workflow(&pool).await;
    WebhookEventRepo::create(&pool, &event(w, "n8n", EVENT_STATUS_PENDING)).await.unwrap();
    WebhookEventRepo::create(&pool, &event(w, "make", EVENT_STATUS_PENDING)).await.unwrap();
    WebhookEventRepo::create(&pool, &event(w, "n8n", EVENT_STATUS_PROCESSED)).await.unwrap();

    let filter = WebhookEventFilter {
        status: Some(EVENT_STATUS_PENDING.into()),
        source: Some("n8n".into()),
        workflow_id: Some(w),
    };
    let rows = WebhookEventRepo::list_filtered(&pool, &filter, 50, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, "n8n");

    let all = WebhookEventRepo::list_filtered(&pool, &WebhookEventFilter::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn webhook_writes_roll_back_together(pool: PgPool) {
    let w = workflow(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    WebhookEventRepo::create(&mut *tx, &event(w, "n8n", EVENT_STATUS_PENDING))
        .await
        .unwrap();
    RealTimeMetricRepo::create(
        &mut *tx,
        &CreateRealTimeMetric {
            workflow_id: w,
            metric_type: "execution_time".into(),
            value: 1250.0,
            unit: "milliseconds".into(),
            metadata: None,
        },
    )
    .await
    .unwrap();
    tx.rollback().await.unwrap();

    let (events,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM webhook_events")
        .fetch_one(&pool)
        .await
        .unwrap();
    let metrics = RealTimeMetricRepo::list_latest(&pool, Some(w), None, 10).await.unwrap();
    assert_eq!(events, 0);
    assert!(metrics.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn alert_transitions_are_guarded_by_current_status(pool: PgPool) {
    let w = workflow(&pool).await;
    let alert = AlertRepo::create(
        &pool,
        &CreateAlert {
            workflow_id: Some(w),
            alert_type: "error".into(),
            title: "Run failed".into(),
            message: "boom".into(),
            severity: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(alert.severity, "medium");
    assert_eq!(alert.status, "active");

    let acked = AlertRepo::acknowledge(&pool, alert.id, "active").await.unwrap().unwrap();
    assert!(acked.acknowledged_at.is_some());

    // A second acknowledge from `active` no longer matches.
    assert!(AlertRepo::acknowledge(&pool, alert.id, "active").await.unwrap().is_none());

    let resolved = AlertRepo::resolve(&pool, alert.id, "acknowledged").await.unwrap().unwrap();
    assert_eq!(resolved.status, "resolved");

    let listed = AlertRepo::list_filtered(&pool, Some("resolved"), Some(w)).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn metric_retention_deletes_old_rows(pool: PgPool) {
    let w = workflow(&pool).await;
    let input = CreateRealTimeMetric {
        workflow_id: w,
        metric_type: "execution_duration".into(),
        value: 4.2,
        unit: "seconds".into(),
        metadata: None,
    };
    let old = RealTimeMetricRepo::create(&pool, &input).await.unwrap();
    RealTimeMetricRepo::create(&pool, &input).await.unwrap();
    sqlx::query("UPDATE real_time_metrics SET timestamp = NOW() - INTERVAL '3 days' WHERE id = $1")
        .bind(old.id)
        .execute(&pool)
        .await
        .unwrap();

    let removed = RealTimeMetricRepo::delete_older_than(&pool, 24).await.unwrap();
    assert_eq!(removed, 1);
    let remaining = RealTimeMetricRepo::list_latest(&pool, None, Some("execution_duration"), 10)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].value, 4.2);
}
