//! Scalar aliases shared by every crate in the workspace.

/// Primary key of an entity table (`BIGSERIAL` in Postgres).
pub type DbId = i64;

/// Primary key of a seeded lookup table (`SMALLINT`, fixed ids).
pub type LookupId = i16;

/// Timestamps are UTC `timestamptz` end to end.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
