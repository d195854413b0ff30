//! Playlist entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waxwing_core::types::{DbId, Timestamp};

/// A playlist row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A membership row from the `playlist_tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistTrack {
    pub id: DbId,
    pub playlist_id: DbId,
    pub track_id: DbId,
    /// 1-based position within the playlist.
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new playlist.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylist {
    pub user_id: DbId,
    pub name: String,
    pub is_public: bool,
}
