//! The `{ "data": ... }` success envelope.

use serde::Serialize;

/// Success payload wrapper used by every 2xx JSON response.
///
/// Keeping the envelope as a typed struct rather than `json!({ "data": .. })`
/// at each call site means the shape cannot drift between handlers. Error
/// responses use a different envelope; see [`crate::error::AppError`].
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
