//! Repository for the `tracks` table.
//!
//! `storage_path` is derived from server-side ids at insert time and never
//! updated afterwards; the object store and the catalog stay in agreement
//! because neither side ever renames.

use sqlx::PgPool;
use waxwing_core::naming::track_audio_key;
use waxwing_core::types::DbId;

use crate::models::track::{CreateTrack, Track};

/// Shared column list; keeps SELECT and RETURNING aligned with the row type.
const COLUMNS: &str = "id, artist_id, title, genre, duration_ms, storage_path, \
                        is_ai_generated, royalty_rate, total_plays, created_at, updated_at";

pub struct TrackRepo;

impl TrackRepo {
    /// Insert a catalog row with its final storage key.
    ///
    /// The id is reserved from the sequence up front because the storage
    /// key embeds it; the row then lands in a single INSERT carrying the
    /// immutable `storage_path`. A missing royalty rate falls back to the
    /// platform default inside the statement.
    pub async fn create(pool: &PgPool, input: &CreateTrack) -> Result<Track, sqlx::Error> {
        let (id,): (DbId,) =
            sqlx::query_as("SELECT nextval(pg_get_serial_sequence('tracks', 'id'))")
                .fetch_one(pool)
                .await?;
        let storage_path = track_audio_key(input.artist_id, id);

        let query = format!(
            "INSERT INTO tracks (id, artist_id, title, genre, duration_ms, is_ai_generated,
                                 royalty_rate, storage_path)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0.05), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(input.artist_id)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(input.duration_ms)
            .bind(input.is_ai_generated)
            .bind(input.royalty_rate)
            .bind(&storage_path)
            .fetch_one(pool)
            .await
    }

    /// Fetch by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        sqlx::query_as::<_, Track>(&format!("SELECT {COLUMNS} FROM tracks WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// An artist's catalog, newest first.
    pub async fn list_by_artist(pool: &PgPool, artist_id: DbId) -> Result<Vec<Track>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tracks WHERE artist_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Track>(&query)
            .bind(artist_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring match over title and genre, most played
    /// first.
    pub async fn search(
        pool: &PgPool,
        query_str: &str,
        limit: i64,
    ) -> Result<Vec<Track>, sqlx::Error> {
        let pattern = format!("%{query_str}%");
        let query = format!(
            "SELECT {COLUMNS} FROM tracks
             WHERE title ILIKE $1 OR genre ILIKE $1
             ORDER BY total_plays DESC, created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
