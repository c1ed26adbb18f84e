//! Pagination defaults and clamping helpers for list endpoints.

/// Default page size for transaction and webhook event listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Largest page a client may request.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Default number of rows returned by "top N" style queries.
pub const DEFAULT_TOP_LIMIT: i64 = 10;

/// Largest "top N" a client may request.
pub const MAX_TOP_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
