//! Track entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waxwing_core::types::{DbId, Timestamp};

/// A track row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub artist_id: DbId,
    pub title: String,
    pub genre: Option<String>,
    pub duration_ms: Option<i32>,
    /// Object-store key the audio lives under. Derived server-side at
    /// creation, immutable afterwards.
    pub storage_path: String,
    pub is_ai_generated: bool,
    /// Unit-interval royalty rate applied by downstream accounting.
    pub royalty_rate: f64,
    pub total_plays: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new track. The storage path is never taken from
/// the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrack {
    pub artist_id: DbId,
    pub title: String,
    pub genre: Option<String>,
    pub duration_ms: Option<i32>,
    pub is_ai_generated: bool,
    /// Unit interval; `None` takes the schema default.
    pub royalty_rate: Option<f64>,
}
