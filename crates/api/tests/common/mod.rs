#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use revdash_api::config::{ServerConfig, StripeConfig};
use revdash_api::router::build_app_router;
use revdash_api::state::AppState;
use revdash_api::ws::WsManager;
use revdash_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// disables Stripe signature checks, and credits Stripe revenue to
/// workflow 1.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        body_limit_bytes: 1024 * 1024,
        db_max_connections: 5,
        stripe: StripeConfig {
            webhook_secret: None,
            workflow_id: 1,
            signature_tolerance_secs: 300,
        },
        webhook_sweep_interval_secs: 0,
        realtime_metrics_retention_hours: 0,
    }
}

/// Build the full application router on `pool` with [`test_config`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config()).0
}

/// Build the router with a custom config, returning the event bus so tests
/// can observe what handlers publish.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> (Router, Arc<EventBus>) {
    let event_bus = Arc::new(EventBus::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::clone(&event_bus),
    };
    (build_app_router(state, &config), event_bus)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, &body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, &body)).await
}

/// POST raw bytes with extra headers (used for signed Stripe deliveries).
pub async fn post_raw(app: Router, uri: &str, body: &[u8], headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::from(body.to_vec())).unwrap()).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Create a workflow through the API and return its id.
pub async fn create_workflow(app: Router, name: &str) -> i64 {
    let response = post_json(app, "/api/v1/workflows", serde_json::json!({ "name": name })).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
