//! Stripe webhook receiver.
//!
//! Takes the raw body so the signature can be checked against the exact
//! bytes Stripe signed. Payments and paid invoices become completed revenue
//! transactions (idempotent on the Stripe object id); subscription events
//! sync membership status. Everything is credited to the configured Stripe
//! workflow.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use revdash_core::error::CoreError;
use revdash_core::membership::{self, STATUS_CANCELLED};
use revdash_core::stripe::{
    classify_stripe_event, minor_to_major, verify_stripe_signature, StripeEventKind,
    SubscriptionChange, EVENT_PAYMENT_SUCCEEDED, EVENT_SUBSCRIPTION_PAYMENT,
};
use revdash_core::transaction::{self, DEFAULT_CURRENCY, STATUS_COMPLETED, TYPE_REVENUE};
use revdash_core::types::DbId;
use revdash_core::webhook::{EVENT_STATUS_PROCESSED, SOURCE_STRIPE};
use revdash_db::models::transaction::{CreateTransaction, Transaction};
use revdash_db::models::webhook_event::NewWebhookEvent;
use revdash_db::repositories::{MembershipRepo, TransactionRepo, WebhookEventRepo};
use revdash_events::{kinds, PlatformEvent};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::StripeConfig;
use crate::state::AppState;

/// Header carrying `t=<unix>,v1=<hex>` signatures.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: Value,
}

/// Failure while handling a Stripe delivery. Always answered with 400.
#[derive(Debug, thiserror::Error)]
pub enum StripeWebhookError {
    #[error("{0}")]
    Signature(String),
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("{0}")]
    Event(String),
    #[error("Failed to record event")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for StripeWebhookError {
    fn into_response(self) -> Response {
        match &self {
            StripeWebhookError::Database(e) => {
                tracing::error!(error = %e, "Stripe webhook database error")
            }
            other => tracing::warn!(error = %other, "Stripe webhook rejected"),
        }
        (StatusCode::BAD_REQUEST, format!("Webhook Error: {self}")).into_response()
    }
}

// ---------------------------------------------------------------------------
// POST /webhooks/stripe
// ---------------------------------------------------------------------------

pub async fn receive_stripe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, StripeWebhookError> {
    verify(&state.config.stripe, &headers, &body)?;

    let event: StripeEvent = serde_json::from_slice(&body)?;
    tracing::info!(
        stripe_event_id = ?event.id,
        event_type = %event.event_type,
        "Stripe webhook received",
    );

    handle_event(&state, event).await?;

    Ok(Json(json!({ "received": true })))
}

/// Check the signature when a signing secret is configured.
fn verify(
    config: &StripeConfig,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), StripeWebhookError> {
    let Some(secret) = config.webhook_secret.as_deref() else {
        return Ok(());
    };
    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| StripeWebhookError::Signature("Missing Stripe-Signature header".into()))?;

    verify_stripe_signature(
        header,
        body,
        secret,
        chrono::Utc::now().timestamp(),
        config.signature_tolerance_secs,
    )
    .map_err(|e| match e {
        CoreError::Unauthorized(msg) => StripeWebhookError::Signature(msg),
        other => StripeWebhookError::Signature(other.to_string()),
    })
}

async fn handle_event(state: &AppState, event: StripeEvent) -> Result<(), StripeWebhookError> {
    let workflow_id = state.config.stripe.workflow_id;
    let object = event.data.object;

    let (stored_type, kind) = match classify_stripe_event(&event.event_type) {
        StripeEventKind::Unhandled => {
            tracing::info!(event_type = %event.event_type, "Unhandled Stripe event type");
            return Ok(());
        }
        kind @ StripeEventKind::PaymentSucceeded => (EVENT_PAYMENT_SUCCEEDED.to_string(), kind),
        kind @ StripeEventKind::InvoicePaid => (EVENT_SUBSCRIPTION_PAYMENT.to_string(), kind),
        kind @ StripeEventKind::Subscription(_) => (event.event_type.clone(), kind),
    };

    let mut tx = state.pool.begin().await?;

    let stored = WebhookEventRepo::create(
        &mut *tx,
        &NewWebhookEvent {
            workflow_id,
            source: SOURCE_STRIPE.to_string(),
            event_type: stored_type.clone(),
            payload: object.clone(),
            status: EVENT_STATUS_PROCESSED,
        },
    )
    .await?;

    let mut created: Option<Transaction> = None;
    let mut memberships_changed: u64 = 0;

    match kind {
        StripeEventKind::PaymentSucceeded => {
            let amount = object
                .get("amount_received")
                .and_then(Value::as_i64)
                .or_else(|| object.get("amount").and_then(Value::as_i64))
                .ok_or_else(|| StripeWebhookError::Event("payment intent has no amount".into()))?;
            let input =
                revenue_transaction(workflow_id, &object, amount, event.id.as_deref(), "payment")?;
            created =
                TransactionRepo::create_if_absent(&mut *tx, &input, STATUS_COMPLETED).await?;
        }
        StripeEventKind::InvoicePaid => {
            let amount = object
                .get("amount_paid")
                .and_then(Value::as_i64)
                .ok_or_else(|| StripeWebhookError::Event("invoice has no amount_paid".into()))?;
            let input =
                revenue_transaction(workflow_id, &object, amount, event.id.as_deref(), "invoice")?;
            created =
                TransactionRepo::create_if_absent(&mut *tx, &input, STATUS_COMPLETED).await?;
        }
        StripeEventKind::Subscription(change) => {
            let subscription_id = object_id(&object)?;
            let next_status = match change {
                SubscriptionChange::Created => None,
                SubscriptionChange::Deleted => Some(STATUS_CANCELLED),
                SubscriptionChange::Updated => object
                    .get("status")
                    .and_then(Value::as_str)
                    .and_then(membership::map_stripe_subscription_status),
            };
            if let Some(status) = next_status {
                memberships_changed =
                    MembershipRepo::set_status_by_subscription(&mut *tx, subscription_id, status)
                        .await?;
                tracing::info!(
                    subscription_id,
                    status,
                    memberships = memberships_changed,
                    "Synced memberships from Stripe subscription",
                );
            }
        }
        StripeEventKind::Unhandled => {}
    }

    tx.commit().await?;

    let bus = &state.event_bus;
    bus.publish(
        PlatformEvent::new(kinds::WEBHOOK_RECEIVED)
            .with_workflow(workflow_id)
            .with_entity("webhook_event", stored.id)
            .with_payload(json!({ "source": SOURCE_STRIPE, "eventType": stored_type })),
    );
    if let Some(txn) = created {
        tracing::info!(transaction_id = txn.id, amount = txn.amount, "Stripe revenue recorded");
        bus.publish(
            PlatformEvent::new(kinds::TRANSACTION_CREATED)
                .with_workflow(workflow_id)
                .with_entity("transaction", txn.id)
                .with_payload(json!({
                    "type": txn.transaction_type,
                    "amount": txn.amount,
                    "status": txn.status,
                })),
        );
    }
    if memberships_changed > 0 {
        bus.publish(
            PlatformEvent::new(kinds::MEMBERSHIP_UPDATED)
                .with_workflow(workflow_id)
                .with_payload(json!({ "count": memberships_changed })),
        );
    }

    Ok(())
}

fn object_id(object: &Value) -> Result<&str, StripeWebhookError> {
    object
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| StripeWebhookError::Event("event object has no id".into()))
}

/// Build a completed revenue transaction from a Stripe payment object.
fn revenue_transaction(
    workflow_id: DbId,
    object: &Value,
    amount_minor: i64,
    stripe_event_id: Option<&str>,
    label: &str,
) -> Result<CreateTransaction, StripeWebhookError> {
    let source_id = object_id(object)?;
    let currency = transaction::normalize_currency(object.get("currency").and_then(Value::as_str))
        .unwrap_or_else(|_| DEFAULT_CURRENCY.to_string());

    Ok(CreateTransaction {
        workflow_id,
        transaction_type: TYPE_REVENUE.to_string(),
        amount: minor_to_major(amount_minor),
        currency: Some(currency),
        source: SOURCE_STRIPE.to_string(),
        source_id: Some(source_id.to_string()),
        description: Some(format!("Stripe {label} {source_id}")),
        metadata: Some(json!({
            "stripeEventId": stripe_event_id,
            "customer": object.get("customer"),
            "subscription": object.get("subscription"),
        })),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;
    use revdash_core::stripe::sign_stripe_payload;

    fn config(secret: Option<&str>) -> StripeConfig {
        StripeConfig {
            webhook_secret: secret.map(String::from),
            workflow_id: 1,
            signature_tolerance_secs: 300,
        }
    }

    #[test]
    fn no_secret_skips_verification() {
        assert!(verify(&config(None), &HeaderMap::new(), b"{}").is_ok());
    }

    #[test]
    fn missing_header_is_rejected_when_secret_set() {
        let result = verify(&config(Some("whsec_x")), &HeaderMap::new(), b"{}");
        assert_matches!(result, Err(StripeWebhookError::Signature(msg)) if msg.contains("Missing"));
    }

    #[test]
    fn current_signature_is_accepted() {
        let body = br#"{"type":"charge.refunded","data":{"object":{}}}"#;
        let now = chrono::Utc::now().timestamp();
        let sig = sign_stripe_payload("whsec_x", now, body);
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&format!("t={now},v1={sig}")).unwrap(),
        );
        assert!(verify(&config(Some("whsec_x")), &headers, body).is_ok());
    }

    #[test]
    fn revenue_transaction_converts_cents_and_currency() {
        let object = json!({"id": "pi_123", "amount_received": 4999, "currency": "eur"});
        let input = revenue_transaction(1, &object, 4999, Some("evt_1"), "payment").unwrap();
        assert_eq!(input.amount, 49.99);
        assert_eq!(input.currency.as_deref(), Some("EUR"));
        assert_eq!(input.source_id.as_deref(), Some("pi_123"));
        assert_eq!(input.transaction_type, "revenue");
    }

    #[test]
    fn object_without_id_is_an_event_error() {
        assert_matches!(object_id(&json!({})), Err(StripeWebhookError::Event(_)));
    }
}
