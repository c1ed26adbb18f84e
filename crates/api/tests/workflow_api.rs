//! HTTP-level integration tests for `/api/v1/workflows`.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_workflow, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_returns_201_and_starts_inactive(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/workflows",
        json!({ "name": "Amazon Affiliates", "description": "EU programs" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Amazon Affiliates");
    assert_eq!(json["data"]["status"], "inactive");
    assert_eq!(json["data"]["execution_count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_blank_name(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/workflows", json!({ "name": "   " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_workflow_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/workflows/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_status_and_rejects_unknown_values(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_workflow(app.clone(), "Newsletter").await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}"),
        json!({ "status": "active" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["name"], "Newsletter");

    let response = put_json(
        app,
        &format!("/api/v1/workflows/{id}"),
        json!({ "status": "paused" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_returns_204_then_404(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_workflow(app.clone(), "Short lived").await;

    let response = delete(app.clone(), &format!("/api/v1/workflows/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(app, &format!("/api/v1/workflows/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_route_is_not_shadowed_by_id_route(pool: PgPool) {
    let app = build_test_app(pool);
    let a = create_workflow(app.clone(), "A").await;
    create_workflow(app.clone(), "B").await;
    put_json(
        app.clone(),
        &format!("/api/v1/workflows/{a}"),
        json!({ "status": "active" }),
    )
    .await;

    let response = get(app, "/api/v1/workflows/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["active"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_returns_all_workflows(pool: PgPool) {
    let app = build_test_app(pool);
    create_workflow(app.clone(), "First").await;
    create_workflow(app.clone(), "Second").await;

    let json = body_json(get(app, "/api/v1/workflows").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Config entries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn config_upsert_overwrites_existing_key(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_workflow(app.clone(), "Orchestrator").await;
    let uri = format!("/api/v1/workflows/{id}/config/max_concurrent");

    let response = put_json(app.clone(), &uri, json!({ "value": 5 })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app.clone(),
        &uri,
        json!({ "value": 10, "description": "parallel runs" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app, &format!("/api/v1/workflows/{id}/config")).await).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["value"], 10);
    assert_eq!(entries[0]["description"], "parallel runs");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn config_for_missing_workflow_returns_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/workflows/424242/config").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(
        app,
        "/api/v1/workflows/424242/config/key",
        json!({ "value": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn config_delete_missing_key_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_workflow(app.clone(), "Orchestrator").await;
    put_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/config/present"),
        json!({ "value": "x" }),
    )
    .await;

    let response = delete(app.clone(), &format!("/api/v1/workflows/{id}/config/present")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(app, &format!("/api/v1/workflows/{id}/config/present")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn config_key_is_trimmed_on_write_and_delete(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_workflow(app.clone(), "Orchestrator").await;
    let uri = format!("/api/v1/workflows/{id}/config/%20padded%20");

    let saved = body_json(put_json(app.clone(), &uri, json!({ "value": 1 })).await).await;
    assert_eq!(saved["data"]["key"], "padded");

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let blank = delete(app, &format!("/api/v1/workflows/{id}/config/%20")).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}
