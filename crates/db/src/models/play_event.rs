//! Play event model.
//!
//! One row per playback report. Doubles as the listening history consumed
//! by the marketing segmentation sweep.

use serde::Serialize;
use sqlx::FromRow;
use waxwing_core::types::{DbId, Timestamp};

/// A row from the `play_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlayEvent {
    pub id: DbId,
    pub track_id: DbId,
    /// NULL for anonymous playback.
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
