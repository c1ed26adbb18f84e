//! Inbound webhook sources, event statuses, and payload shaping.

use serde_json::{Map, Value};

use crate::error::{validate_one_of, CoreError};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

pub const SOURCE_N8N: &str = "n8n";
pub const SOURCE_MAKE: &str = "make";
pub const SOURCE_STRIPE: &str = "stripe";

/// Default event types when a runner omits `eventType`.
pub const DEFAULT_N8N_EVENT_TYPE: &str = "execution";
pub const DEFAULT_MAKE_EVENT_TYPE: &str = "scenario_execution";

/// Maximum source name length (matches the `VARCHAR(50)` column).
pub const MAX_SOURCE_LENGTH: usize = 50;

/// Normalize a generic webhook source name to lowercase.
pub fn normalize_source(source: &str) -> Result<String, CoreError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(CoreError::Validation("source must not be empty".into()));
    }
    if source.len() > MAX_SOURCE_LENGTH {
        return Err(CoreError::Validation(format!(
            "source exceeds maximum length of {MAX_SOURCE_LENGTH} characters"
        )));
    }
    Ok(source.to_lowercase())
}

// ---------------------------------------------------------------------------
// Event status
// ---------------------------------------------------------------------------

pub const EVENT_STATUS_PENDING: &str = "pending";
pub const EVENT_STATUS_PROCESSED: &str = "processed";
pub const EVENT_STATUS_FAILED: &str = "failed";

pub const VALID_EVENT_STATUSES: &[&str] = &[
    EVENT_STATUS_PENDING,
    EVENT_STATUS_PROCESSED,
    EVENT_STATUS_FAILED,
];

pub fn validate_event_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_EVENT_STATUSES, "webhook event status")
}

/// Pending events handled per `process-pending` call or sweeper tick.
pub const PROCESS_PENDING_BATCH: i64 = 100;

// ---------------------------------------------------------------------------
// Payload shaping
// ---------------------------------------------------------------------------

/// Merge runner metadata into the stored event payload.
///
/// Object payloads keep their fields; any other payload (array, scalar) is
/// kept under `"payload"`. `extra` entries overwrite same-named fields, and
/// `receivedAt` is always set.
pub fn merge_payload(
    payload: Option<Value>,
    extra: impl IntoIterator<Item = (&'static str, Value)>,
    received_at: &str,
) -> Value {
    let mut merged = match payload {
        Some(Value::Object(map)) => map,
        None | Some(Value::Null) => Map::new(),
        Some(other) => {
            let mut map = Map::new();
            map.insert("payload".into(), other);
            map
        }
    };
    for (key, value) in extra {
        merged.insert(key.into(), value);
    }
    merged.insert("receivedAt".into(), Value::String(received_at.to_owned()));
    Value::Object(merged)
}
