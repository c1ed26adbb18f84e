//! Shared query parameter types for API handlers.
//!
//! Query structs that appear across several handler modules live here.
//! Single-use filters stay next to their handler.

use chrono::{DateTime, Utc};
use revdash_core::error::CoreError;
use revdash_core::types::Timestamp;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Optional `?start_date=&end_date=` window, RFC 3339 strings.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeParams {
    /// Parse both bounds, rejecting malformed dates and inverted ranges.
    pub fn parse(&self) -> Result<(Option<Timestamp>, Option<Timestamp>), CoreError> {
        let start = self
            .start_date
            .as_deref()
            .map(|s| parse_timestamp("start_date", s))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|s| parse_timestamp("end_date", s))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(CoreError::Validation(
                    "start_date must not be after end_date".into(),
                ));
            }
        }
        Ok((start, end))
    }
}

/// Parse an RFC 3339 timestamp query value.
pub fn parse_timestamp(field: &str, value: &str) -> Result<Timestamp, CoreError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            CoreError::Validation(format!("{field} must be an RFC 3339 timestamp, got '{value}'"))
        })
}
