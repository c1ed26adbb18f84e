//! Stripe webhook event classification and signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Default tolerance between the signed timestamp and now.
pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Event type stored for a successful payment intent.
pub const EVENT_PAYMENT_SUCCEEDED: &str = "payment_succeeded";

/// Event type stored for a paid subscription invoice.
pub const EVENT_SUBSCRIPTION_PAYMENT: &str = "subscription_payment";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionChange {
    Created,
    Updated,
    Deleted,
}

/// The Stripe events the dashboard acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventKind {
    PaymentSucceeded,
    Subscription(SubscriptionChange),
    InvoicePaid,
    Unhandled,
}

pub fn classify_stripe_event(event_type: &str) -> StripeEventKind {
    match event_type {
        "payment_intent.succeeded" => StripeEventKind::PaymentSucceeded,
        "customer.subscription.created" => {
            StripeEventKind::Subscription(SubscriptionChange::Created)
        }
        "customer.subscription.updated" => {
            StripeEventKind::Subscription(SubscriptionChange::Updated)
        }
        "customer.subscription.deleted" => {
            StripeEventKind::Subscription(SubscriptionChange::Deleted)
        }
        "invoice.payment_succeeded" => StripeEventKind::InvoicePaid,
        _ => StripeEventKind::Unhandled,
    }
}

/// Convert a Stripe amount in minor units (cents) to a decimal amount.
pub fn minor_to_major(amount: i64) -> f64 {
    amount as f64 / 100.0
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header has the form `t=<unix>,v1=<hex>[,v1=<hex>...]`. The signed
/// payload is `"{t}.{body}"`. Any matching `v1` signature is accepted, as
/// long as `t` is within `tolerance_secs` of `now_unix`.
pub fn verify_stripe_signature(
    header: &str,
    body: &[u8],
    secret: &str,
    now_unix: i64,
    tolerance_secs: i64,
) -> Result<(), CoreError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = value.parse().ok();
            }
            "v1" => {
                if let Ok(sig) = hex::decode(value) {
                    signatures.push(sig);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        CoreError::Unauthorized("Unable to extract timestamp from signature header".into())
    })?;
    if signatures.is_empty() {
        return Err(CoreError::Unauthorized(
            "No v1 signatures found in signature header".into(),
        ));
    }
    if now_unix.abs_diff(timestamp) > tolerance_secs.max(0) as u64 {
        return Err(CoreError::Unauthorized(
            "Timestamp outside the tolerance zone".into(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| CoreError::Internal(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);

    let matched = signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok());
    if matched {
        Ok(())
    } else {
        Err(CoreError::Unauthorized(
            "No signatures found matching the expected signature for payload".into(),
        ))
    }
}

/// Compute the `v1` signature for a payload. Used to sign test fixtures.
pub fn sign_stripe_payload(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
    const NOW: i64 = 1_760_000_000;

    fn header(t: i64, sig: &str) -> String {
        format!("t={t},v1={sig}")
    }

    // -- classification --

    #[test]
    fn classifies_known_events() {
        assert_eq!(
            classify_stripe_event("payment_intent.succeeded"),
            StripeEventKind::PaymentSucceeded
        );
        assert_eq!(
            classify_stripe_event("customer.subscription.deleted"),
            StripeEventKind::Subscription(SubscriptionChange::Deleted)
        );
        assert_eq!(
            classify_stripe_event("invoice.payment_succeeded"),
            StripeEventKind::InvoicePaid
        );
        assert_eq!(
            classify_stripe_event("charge.refunded"),
            StripeEventKind::Unhandled
        );
    }

    #[test]
    fn minor_units_convert_to_decimal() {
        assert_eq!(minor_to_major(2999), 29.99);
        assert_eq!(minor_to_major(0), 0.0);
    }

    // -- signatures --

    #[test]
    fn valid_signature_is_accepted() {
        let sig = sign_stripe_payload(SECRET, NOW, BODY);
        assert!(verify_stripe_signature(&header(NOW, &sig), BODY, SECRET, NOW + 10, 300).is_ok());
    }

    #[test]
    fn any_matching_v1_is_accepted() {
        let sig = sign_stripe_payload(SECRET, NOW, BODY);
        let h = format!("t={NOW},v1=deadbeef,v1={sig}");
        assert!(verify_stripe_signature(&h, BODY, SECRET, NOW, 300).is_ok());
    }

    #[test]
    fn tampered_body_is_rejected() {
        let sig = sign_stripe_payload(SECRET, NOW, BODY);
        let result = verify_stripe_signature(&header(NOW, &sig), b"{}", SECRET, NOW, 300);
        assert_matches!(result, Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let sig = sign_stripe_payload("whsec_other", NOW, BODY);
        assert!(verify_stripe_signature(&header(NOW, &sig), BODY, SECRET, NOW, 300).is_err());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let sig = sign_stripe_payload(SECRET, NOW, BODY);
        let result = verify_stripe_signature(&header(NOW, &sig), BODY, SECRET, NOW + 301, 300);
        assert_matches!(result, Err(CoreError::Unauthorized(msg)) if msg.contains("tolerance"));
    }

    #[test]
    fn extreme_timestamps_are_rejected() {
        for t in [i64::MIN, i64::MAX] {
            let h = format!("t={t},v1=00");
            let result = verify_stripe_signature(&h, BODY, SECRET, NOW, 300);
            assert_matches!(result, Err(CoreError::Unauthorized(msg)) if msg.contains("tolerance"));
        }
    }

    #[test]
    fn malformed_header_is_rejected() {
        assert!(verify_stripe_signature("garbage", BODY, SECRET, NOW, 300).is_err());
        assert!(verify_stripe_signature(&format!("t={NOW}"), BODY, SECRET, NOW, 300).is_err());
    }
}
