//! Object storage access for track audio.
//!
//! Audio bytes never pass through the API server. Handlers hand clients
//! short-lived presigned URLs instead: a write URL at upload registration
//! time and a read URL at stream time. [`ObjectStore`] is the seam the API
//! layer programs against; [`S3ObjectStore`] is the production
//! implementation backed by the AWS SDK.

pub mod s3;
pub mod store;

pub use s3::{S3Config, S3ObjectStore};
pub use store::{ObjectStore, StorageError, STREAM_URL_TTL, UPLOAD_URL_TTL};
