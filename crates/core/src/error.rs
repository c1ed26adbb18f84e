use crate::types::DbId;

/// Domain-level error shared by every crate in the workspace.
///
/// The API layer maps each variant onto an HTTP status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reject a value that is not a member of `allowed`.
///
/// `what` names the field in the error message, e.g. `"workflow status"`.
pub(crate) fn validate_one_of(value: &str, allowed: &[&str], what: &str) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {what} '{value}'. Must be one of: {allowed:?}"
        )))
    }
}
