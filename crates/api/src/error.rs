use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use revdash_core::error::CoreError;
use serde::Serialize;

/// Postgres SQLSTATE codes the API translates into client errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Shown instead of the real cause for every 500.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error returned by query and mutation handlers.
///
/// Renders as `{"error": message, "code": CODE}`. Server-side failures are
/// logged and replaced with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Core(core) => core_reply(core),
            AppError::Database(err) => database_reply(err),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("BAD_REQUEST", msg.as_str()))
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

fn core_reply(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", msg.as_str()),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg.as_str())),
        CoreError::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("UNAUTHORIZED", msg.as_str()),
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// Missing rows become 404. A `uq_*` unique violation becomes 409, and a
/// foreign key violation becomes 400 `INVALID_REFERENCE`. Anything else
/// is a sanitized 500.
fn database_reply(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        );
    }

    if let Some(db_err) = err.as_database_error() {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                return (
                    StatusCode::CONFLICT,
                    ErrorBody::new(
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    ),
                );
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new(
                        "INVALID_REFERENCE",
                        format!("Referenced record does not exist: {constraint}"),
                    ),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
}
