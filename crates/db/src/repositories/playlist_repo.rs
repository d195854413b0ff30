//! Repository for the `playlists` and `playlist_tracks` tables.
//!
//! Track membership lives in `playlist_tracks`, ordered by a `position`
//! column assigned at insert time so appends never need a read first.

use sqlx::PgPool;
use waxwing_core::types::DbId;

use crate::models::playlist::{CreatePlaylist, Playlist, PlaylistTrack};
use crate::models::track::Track;

/// Shared column list; keeps SELECT and RETURNING aligned with the row type.
const COLUMNS: &str = "id, user_id, name, is_public, created_at, updated_at";

const TRACK_COLUMNS: &str = "id, playlist_id, track_id, position, created_at, updated_at";

pub struct PlaylistRepo;

impl PlaylistRepo {
    /// Insert a new playlist, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlaylist) -> Result<Playlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO playlists (user_id, name, is_public)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    /// Find a playlist by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's playlists, most recent first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Playlist>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM playlists WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Append a track at the end of the playlist.
    pub async fn add_track(
        pool: &PgPool,
        playlist_id: DbId,
        track_id: DbId,
    ) -> Result<PlaylistTrack, sqlx::Error> {
        let query = format!(
            "INSERT INTO playlist_tracks (playlist_id, track_id, position)
             SELECT $1, $2, COALESCE(MAX(position), 0) + 1
             FROM playlist_tracks WHERE playlist_id = $1
             RETURNING {TRACK_COLUMNS}"
        );
        sqlx::query_as::<_, PlaylistTrack>(&query)
            .bind(playlist_id)
            .bind(track_id)
            .fetch_one(pool)
            .await
    }

    /// Remove a track from a playlist. Returns `true` if a row was deleted.
    pub async fn remove_track(
        pool: &PgPool,
        playlist_id: DbId,
        track_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let deleted =
            sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = $1 AND track_id = $2")
                .bind(playlist_id)
                .bind(track_id)
                .execute(pool)
                .await?;
        Ok(deleted.rows_affected() > 0)
    }

    /// List a playlist's tracks in position order.
    pub async fn list_tracks(pool: &PgPool, playlist_id: DbId) -> Result<Vec<Track>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Track>(
            "SELECT t.id, t.artist_id, t.title, t.genre, t.duration_ms, t.storage_path,
                    t.is_ai_generated, t.royalty_rate, t.total_plays, t.created_at, t.updated_at
             FROM playlist_tracks pt
             JOIN tracks t ON t.id = pt.track_id
             WHERE pt.playlist_id = $1
             ORDER BY pt.position ASC",
        )
        .bind(playlist_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
