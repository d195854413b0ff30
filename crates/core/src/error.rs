//! Core domain error type.
//!
//! Shared by all crates; the API layer maps each variant onto a stable HTTP
//! status and error code.

use crate::types::DbId;

/// Domain-level error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a validation rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness or state conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid identity proof.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid identity, insufficient role or entitlement.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An external collaborator (storage, payments, prediction) failed or
    /// timed out.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
