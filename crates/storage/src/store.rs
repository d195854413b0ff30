//! The [`ObjectStore`] seam and its error type.

use std::time::Duration;

use async_trait::async_trait;

/// How long a presigned upload (PUT) URL stays valid.
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// How long a presigned stream (GET) URL stays valid.
pub const STREAM_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested expiry cannot be expressed as a presigning config.
    #[error("invalid presign expiry: {0}")]
    Expiry(String),

    /// The store rejected the signing request.
    #[error("object store request failed: {0}")]
    Request(String),
}

/// Presigned-URL issuing backend for audio objects.
///
/// Implementations must be cheap to share (`Arc<dyn ObjectStore>`), so any
/// underlying client pooling lives inside the implementation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Produce a URL that permits a single direct PUT of `key` with the
    /// given content type, valid for `ttl`.
    async fn sign_upload(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, StorageError>;

    /// Produce a URL that permits direct GETs of `key`, valid for `ttl`.
    async fn sign_download(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}
