//! HTTP-level integration tests for the webhook receivers under
//! `/api/v1/webhooks` and the `/api/v1/webhook-events` log.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, build_test_app, build_test_app_with, create_workflow, get, post_json,
    post_raw, test_config,
};
use revdash_core::stripe::sign_stripe_payload;
use revdash_db::models::membership::CreateMembership;
use revdash_db::models::workflow::CreateWorkflow;
use revdash_db::repositories::{MembershipRepo, WorkflowRepo};
use revdash_events::kinds;
use serde_json::json;
use sqlx::PgPool;

async fn seed_workflow(pool: &PgPool, name: &str) -> i64 {
    WorkflowRepo::create(
        pool,
        &CreateWorkflow {
            name: name.to_string(),
            description: None,
            config: None,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// n8n / Make
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn n8n_completed_run_updates_workflow_and_stores_event(pool: PgPool) {
    let app = build_test_app(pool);
    let wf = create_workflow(app.clone(), "Content Pipeline").await;

    let response = post_json(
        app.clone(),
        "/api/v1/webhooks/n8n",
        json!({
            "workflowId": wf,
            "executionId": "exec-1",
            "status": "completed",
            "executionTime": 2500,
            "payload": { "items": 3 },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["success"], true);
    assert_eq!(ack["message"], "Webhook processed successfully");
    assert_eq!(ack["eventType"], "execution");

    let workflow = body_json(get(app.clone(), &format!("/api/v1/workflows/{wf}")).await).await;
    assert_eq!(workflow["data"]["status"], "active");
    assert_eq!(workflow["data"]["execution_count"], 1);
    assert_eq!(workflow["data"]["success_rate"], 100.0);
    assert_eq!(workflow["data"]["avg_execution_time"], 2.5);

    let events = body_json(get(app.clone(), "/api/v1/webhook-events?source=n8n").await).await;
    let stored = &events["data"][0];
    assert_eq!(stored["status"], "pending");
    assert_eq!(stored["payload"]["items"], 3);
    assert_eq!(stored["payload"]["executionId"], "exec-1");
    assert!(stored["payload"]["receivedAt"].is_string());

    let metrics = body_json(get(app, "/api/v1/realtime/metrics").await).await;
    assert_eq!(metrics["data"][0]["metric_type"], "execution_time");
    assert_eq!(metrics["data"][0]["value"], 2500.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn n8n_failed_run_raises_alert(pool: PgPool) {
    let app = build_test_app(pool);
    let wf = create_workflow(app.clone(), "Scraper").await;

    post_json(
        app.clone(),
        "/api/v1/webhooks/n8n",
        json!({ "workflowId": wf, "status": "failed", "error": "timeout" }),
    )
    .await;

    let workflow = body_json(get(app.clone(), &format!("/api/v1/workflows/{wf}")).await).await;
    assert_eq!(workflow["data"]["status"], "error");
    assert_eq!(workflow["data"]["success_rate"], 0.0);

    let alerts = body_json(get(app, &format!("/api/v1/alerts?workflow_id={wf}")).await).await;
    let alert = &alerts["data"][0];
    assert_eq!(alert["type"], "error");
    assert_eq!(alert["severity"], "high");
    assert_eq!(alert["status"], "active");
    assert_eq!(alert["title"], "Workflow 'Scraper' failed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn n8n_requires_workflow_id_and_existing_workflow(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app.clone(), "/api/v1/webhooks/n8n", json!({ "status": "completed" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing required field: workflowId");

    let response = post_json(app, "/api/v1/webhooks/n8n", json!({ "workflowId": 4242 })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn make_running_status_only_counts_execution(pool: PgPool) {
    let app = build_test_app(pool);
    let wf = create_workflow(app.clone(), "Make scenario").await;

    let response = post_json(
        app.clone(),
        "/api/v1/webhooks/make",
        json!({ "workflowId": wf, "scenarioId": 77, "status": "running", "duration": 4 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["message"], "Make webhook processed successfully");
    assert_eq!(ack["eventType"], "scenario_execution");

    let workflow = body_json(get(app, &format!("/api/v1/workflows/{wf}")).await).await;
    assert_eq!(workflow["data"]["status"], "processing");
    assert_eq!(workflow["data"]["execution_count"], 1);
    assert_eq!(workflow["data"]["success_rate"], 0.0);
    assert_eq!(workflow["data"]["avg_execution_time"], 0.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_status_leaves_workflow_untouched(pool: PgPool) {
    let app = build_test_app(pool);
    let wf = create_workflow(app.clone(), "Quiet runner").await;

    for (uri, status) in [("/api/v1/webhooks/n8n", ""), ("/api/v1/webhooks/make", "  ")] {
        let response = post_json(
            app.clone(),
            uri,
            json!({ "workflowId": wf, "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let workflow = body_json(get(app, &format!("/api/v1/workflows/{wf}")).await).await;
    assert_eq!(workflow["data"]["status"], "inactive");
    assert_eq!(workflow["data"]["execution_count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn runner_report_is_published_on_the_bus(pool: PgPool) {
    let wf = seed_workflow(&pool, "Observed").await;
    let (app, bus) = build_test_app_with(pool, test_config());
    let mut rx = bus.subscribe();

    post_json(
        app,
        "/api/v1/webhooks/make",
        json!({ "workflowId": wf, "status": "done", "duration": 1.5 }),
    )
    .await;

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert_eq!(event.workflow_id, Some(wf));
        seen.push(event.event_type);
    }
    assert!(seen.contains(&kinds::WEBHOOK_RECEIVED.to_string()));
    assert!(seen.contains(&kinds::METRIC_RECORDED.to_string()));
    assert!(seen.contains(&kinds::WORKFLOW_STATUS_CHANGED.to_string()));
}

// ---------------------------------------------------------------------------
// Generic
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generic_requires_all_fields(pool: PgPool) {
    let app = build_test_app(pool);
    let wf = create_workflow(app.clone(), "Generic").await;

    let response = post_json(
        app,
        "/api/v1/webhooks/generic",
        json!({ "workflowId": wf, "source": "  " , "eventType": "ping" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Missing required fields: workflowId, source, eventType"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generic_stores_pending_event_with_lowercased_source(pool: PgPool) {
    let app = build_test_app(pool);
    let wf = create_workflow(app.clone(), "Generic").await;

    let response = post_json(
        app.clone(),
        "/api/v1/webhooks/generic",
        json!({ "workflowId": wf, "source": "Zapier", "eventType": "zap_run", "payload": [1, 2] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Generic webhook processed successfully"
    );

    let events = body_json(get(app, "/api/v1/webhook-events?source=zapier").await).await;
    let stored = &events["data"][0];
    assert_eq!(stored["source"], "zapier");
    assert_eq!(stored["event_type"], "zap_run");
    assert_eq!(stored["status"], "pending");
    assert_eq!(stored["payload"]["payload"], json!([1, 2]));
}

// ---------------------------------------------------------------------------
// Pending processing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn process_pending_marks_events_processed(pool: PgPool) {
    let app = build_test_app(pool);
    let wf = create_workflow(app.clone(), "Queue").await;
    for _ in 0..3 {
        post_json(app.clone(), "/api/v1/webhooks/n8n", json!({ "workflowId": wf })).await;
    }

    let response = post_json(app.clone(), "/api/v1/webhooks/process-pending", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["processed"], 3);
    assert_eq!(json["message"], "Processed 3 pending webhooks");

    let pending = body_json(get(app.clone(), "/api/v1/webhook-events?status=pending").await).await;
    assert!(pending["data"].as_array().unwrap().is_empty());

    let processed = body_json(get(app.clone(), "/api/v1/webhook-events?status=processed").await).await;
    assert!(processed["data"][0]["processed_at"].is_string());

    let again = body_json(post_json(app, "/api/v1/webhooks/process-pending", json!({})).await).await;
    assert_eq!(again["processed"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn webhook_event_list_rejects_unknown_status(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/webhook-events?status=archived").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Stripe
// ---------------------------------------------------------------------------

fn payment_intent(id: &str, cents: i64) -> serde_json::Value {
    json!({
        "id": "evt_test",
        "type": "payment_intent.succeeded",
        "data": { "object": {
            "id": id,
            "amount_received": cents,
            "currency": "usd",
            "customer": "cus_1",
        }},
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stripe_payment_records_completed_revenue_once(pool: PgPool) {
    let wf = seed_workflow(&pool, "Stripe").await;
    let mut config = test_config();
    config.stripe.workflow_id = wf;
    let (app, _bus) = build_test_app_with(pool, config);

    let body = serde_json::to_vec(&payment_intent("pi_1", 4999)).unwrap();
    for _ in 0..2 {
        let response = post_raw(app.clone(), "/api/v1/webhooks/stripe", &body, &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["received"], true);
    }

    let txns = body_json(get(app.clone(), &format!("/api/v1/transactions?workflow_id={wf}")).await).await;
    let rows = txns["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1, "redelivery must not duplicate revenue");
    assert_eq!(rows[0]["amount"], 49.99);
    assert_eq!(rows[0]["status"], "completed");
    assert_eq!(rows[0]["source_id"], "pi_1");

    let events = body_json(get(app, "/api/v1/webhook-events?source=stripe").await).await;
    let events = events["data"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_type"], "payment_succeeded");
    assert_eq!(events[0]["status"], "processed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stripe_signature_is_enforced_when_secret_configured(pool: PgPool) {
    let wf = seed_workflow(&pool, "Stripe").await;
    let mut config = test_config();
    config.stripe.workflow_id = wf;
    config.stripe.webhook_secret = Some("whsec_test".into());
    let (app, _bus) = build_test_app_with(pool, config);

    let body = serde_json::to_vec(&payment_intent("pi_2", 1000)).unwrap();

    let response = post_raw(app.clone(), "/api/v1/webhooks/stripe", &body, &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.starts_with("Webhook Error:"), "got: {text}");

    let forged = format!("t={},v1={}", chrono::Utc::now().timestamp(), "00".repeat(32));
    let response = post_raw(
        app.clone(),
        "/api/v1/webhooks/stripe",
        &body,
        &[("stripe-signature", &forged)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let extreme = format!("t={},v1=00", i64::MIN);
    let response = post_raw(
        app.clone(),
        "/api/v1/webhooks/stripe",
        &body,
        &[("stripe-signature", &extreme)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("tolerance"), "got: {text}");

    let now = chrono::Utc::now().timestamp();
    let signed = format!("t={now},v1={}", sign_stripe_payload("whsec_test", now, &body));
    let response = post_raw(
        app,
        "/api/v1/webhooks/stripe",
        &body,
        &[("stripe-signature", &signed)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stripe_subscription_deleted_cancels_membership(pool: PgPool) {
    let wf = seed_workflow(&pool, "Memberships").await;
    MembershipRepo::create(
        &pool,
        &CreateMembership {
            user_id: "user-1".into(),
            workflow_id: wf,
            tier: "pro".into(),
            status: None,
            amount: 29.0,
            currency: None,
            end_date: None,
            auto_renew: true,
            stripe_subscription_id: Some("sub_1".into()),
        },
    )
    .await
    .unwrap();
    let mut config = test_config();
    config.stripe.workflow_id = wf;
    let (app, _bus) = build_test_app_with(pool, config);

    let body = serde_json::to_vec(&json!({
        "id": "evt_sub",
        "type": "customer.subscription.deleted",
        "data": { "object": { "id": "sub_1", "status": "canceled" } },
    }))
    .unwrap();
    let response = post_raw(app.clone(), "/api/v1/webhooks/stripe", &body, &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let members = body_json(get(app, "/api/v1/memberships").await).await;
    assert_eq!(members["data"][0]["status"], "cancelled");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stripe_unhandled_event_is_acknowledged_without_storing(pool: PgPool) {
    let app = build_test_app(pool);
    let body = br#"{"id":"evt_x","type":"charge.refunded","data":{"object":{"id":"ch_1"}}}"#;

    let response = post_raw(app.clone(), "/api/v1/webhooks/stripe", body, &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let events = body_json(get(app, "/api/v1/webhook-events").await).await;
    assert!(events["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stripe_malformed_body_is_400(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_raw(app, "/api/v1/webhooks/stripe", b"not json", &[]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
