//! Alert type, severity, and lifecycle rules.
//!
//! Alerts move `active -> acknowledged -> resolved`; an active alert may
//! also be resolved directly. Resolved alerts are final.

use crate::error::{validate_one_of, CoreError};

// ---------------------------------------------------------------------------
// Type / severity constants
// ---------------------------------------------------------------------------

pub const TYPE_ERROR: &str = "error";
pub const TYPE_WARNING: &str = "warning";
pub const TYPE_INFO: &str = "info";
pub const TYPE_SUCCESS: &str = "success";

pub const VALID_TYPES: &[&str] = &[TYPE_ERROR, TYPE_WARNING, TYPE_INFO, TYPE_SUCCESS];

pub const SEVERITY_LOW: &str = "low";
pub const SEVERITY_MEDIUM: &str = "medium";
pub const SEVERITY_HIGH: &str = "high";
pub const SEVERITY_CRITICAL: &str = "critical";

pub const VALID_SEVERITIES: &[&str] = &[
    SEVERITY_LOW,
    SEVERITY_MEDIUM,
    SEVERITY_HIGH,
    SEVERITY_CRITICAL,
];

/// Severity applied when a client omits one.
pub const DEFAULT_SEVERITY: &str = SEVERITY_MEDIUM;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_ACKNOWLEDGED: &str = "acknowledged";
pub const STATUS_RESOLVED: &str = "resolved";

pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_ACKNOWLEDGED, STATUS_RESOLVED];

pub fn validate_type(alert_type: &str) -> Result<(), CoreError> {
    validate_one_of(alert_type, VALID_TYPES, "alert type")
}

pub fn validate_severity(severity: &str) -> Result<(), CoreError> {
    validate_one_of(severity, VALID_SEVERITIES, "alert severity")
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_STATUSES, "alert status")
}

/// Validate the required free-text fields of a new alert.
pub fn validate_content(title: &str, message: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    if title.len() > 255 {
        return Err(CoreError::Validation(
            "title exceeds maximum length of 255 characters".into(),
        ));
    }
    if message.trim().is_empty() {
        return Err(CoreError::Validation("message must not be empty".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Statuses reachable from `from_status`.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_ACTIVE => &[STATUS_ACKNOWLEDGED, STATUS_RESOLVED],
        STATUS_ACKNOWLEDGED => &[STATUS_RESOLVED],
        _ => &[],
    }
}

/// Validate an alert status transition; disallowed moves are conflicts.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot move alert from '{current}' to '{next}'"
        )))
    }
}
