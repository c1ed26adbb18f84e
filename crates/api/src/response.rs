//! Shared response envelope types for API handlers.
//!
//! Query and mutation endpoints answer with a `{ "data": ... }` envelope.
//! Webhook receivers are the exception: runners and Stripe expect their
//! own acknowledgement shapes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
