//! S3-backed [`ObjectStore`] implementation.
//!
//! URLs are presigned locally with SigV4, so issuing them involves no
//! round-trip to AWS. The configured bucket is the only bucket this
//! store will ever sign for.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::debug;

use crate::store::{ObjectStore, StorageError};

/// Connection settings for the audio bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket holding track audio objects.
    pub bucket: String,
    /// AWS region the bucket lives in.
    pub region: String,
    /// Optional custom endpoint (MinIO or localstack in development).
    /// When set, path-style addressing is forced.
    pub endpoint_url: Option<String>,
    /// Optional static credentials. When unset the SDK default provider
    /// chain (env, profile, IMDS) is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3Config {
    /// Load settings from the environment.
    ///
    /// Panics if `AUDIO_BUCKET` is missing; everything else has a default
    /// or is optional.
    pub fn from_env() -> Self {
        Self {
            bucket: std::env::var("AUDIO_BUCKET").expect("AUDIO_BUCKET must be set"),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
        }
    }
}

/// Presigning client for the audio bucket.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build the store from its config.
    ///
    /// Resolves the credential chain once up front; per-URL signing after
    /// that is purely local.
    pub async fn connect(config: S3Config) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region));

        if let (Some(key_id), Some(secret)) = (config.access_key_id, config.secret_access_key) {
            loader = loader
                .credentials_provider(Credentials::new(key_id, secret, None, None, "waxwing-env"));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket,
        }
    }

    fn presigning(ttl: Duration) -> Result<PresigningConfig, StorageError> {
        PresigningConfig::expires_in(ttl).map_err(|e| StorageError::Expiry(e.to_string()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn sign_upload(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(Self::presigning(ttl)?)
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        debug!(key, ttl_secs = ttl.as_secs(), "signed upload URL");
        Ok(presigned.uri().to_string())
    }

    async fn sign_download(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(Self::presigning(ttl)?)
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        debug!(key, ttl_secs = ttl.as_secs(), "signed download URL");
        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{STREAM_URL_TTL, UPLOAD_URL_TTL};

    /// Static credentials make SigV4 presigning fully offline.
    fn test_store() -> S3Config {
        S3Config {
            bucket: "waxwing-audio".to_string(),
            region: "eu-west-1".to_string(),
            endpoint_url: Some("http://localhost:9000".to_string()),
            access_key_id: Some("test-access-key".to_string()),
            secret_access_key: Some("test-secret-key".to_string()),
        }
    }

    #[tokio::test]
    async fn upload_url_targets_bucket_and_key() {
        let store = S3ObjectStore::connect(test_store()).await;

        let url = store
            .sign_upload("tracks/9/41.mp3", "audio/mpeg", UPLOAD_URL_TTL)
            .await
            .expect("presigning should succeed");

        assert!(url.starts_with("http://localhost:9000/waxwing-audio/tracks/9/41.mp3"));
        assert!(url.contains("X-Amz-Expires=900"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn download_url_uses_stream_ttl() {
        let store = S3ObjectStore::connect(test_store()).await;

        let url = store
            .sign_download("tracks/9/41.mp3", STREAM_URL_TTL)
            .await
            .expect("presigning should succeed");

        assert!(url.contains("/waxwing-audio/tracks/9/41.mp3"));
        assert!(url.contains("X-Amz-Expires=3600"));
    }

    #[tokio::test]
    async fn rejects_unsignable_expiry() {
        let store = S3ObjectStore::connect(test_store()).await;

        // SigV4 presigning caps out at one week.
        let err = store
            .sign_download("tracks/9/41.mp3", Duration::from_secs(60 * 60 * 24 * 30))
            .await
            .expect_err("a one-month expiry should be rejected");

        assert!(matches!(err, StorageError::Expiry(_)));
    }
}
