//! HTTP error handling for the API.
//!
//! Handlers return [`AppResult`]; every failure funnels through
//! [`AppError::into_response`] so clients always see the same JSON shape:
//!
//! ```json
//! { "error": "Track with id 7 not found", "code": "NOT_FOUND" }
//! ```
//!
//! Messages on 4xx responses are safe to show to users. 5xx responses carry a
//! generic message; the detail goes to the log instead of the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use waxwing_core::error::CoreError;

/// Error type returned by every handler.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain failure; the [`CoreError`] variant picks the status.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Raw sqlx failure that escaped the repository layer.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input detected in the handler itself.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unexpected condition the handler cannot express as a domain error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<waxwing_storage::StorageError> for AppError {
    fn from(err: waxwing_storage::StorageError) -> Self {
        AppError::Core(CoreError::Upstream(err.to_string()))
    }
}

impl From<waxwing_billing::BillingError> for AppError {
    fn from(err: waxwing_billing::BillingError) -> Self {
        AppError::Core(CoreError::Upstream(err.to_string()))
    }
}

/// Status, machine-readable code, human-readable message.
type ResponseParts = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.response_parts();
        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

impl AppError {
    fn response_parts(&self) -> ResponseParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => database_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                opaque_internal()
            }
        }
    }
}

fn core_parts(core: &CoreError) -> ResponseParts {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Upstream(msg) => {
            tracing::error!(error = %msg, "Upstream service failure");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "An upstream service failed".to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            opaque_internal()
        }
    }
}

/// Map a sqlx error without leaking database detail to the client.
///
/// `RowNotFound` becomes 404. A unique violation (Postgres code 23505) on a
/// constraint named `uq_*` becomes 409; the schema tests enforce that naming
/// convention, so any other constraint collision surfaces as 500.
fn database_parts(err: &sqlx::Error) -> ResponseParts {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
        }
    }

    tracing::error!(error = %err, "Database error");
    opaque_internal()
}

fn opaque_internal() -> ResponseParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
