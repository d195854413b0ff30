//! Playback history storage.
//!
//! One row per reported play; `user_id` is NULL for anonymous listeners.
//! The per-track counter on `tracks` is denormalized from these rows and
//! updated in the same transaction that records the event.

use sqlx::PgPool;
use waxwing_core::types::DbId;

use crate::models::play_event::PlayEvent;

/// Shared column list; keeps SELECT and RETURNING aligned with the row type.
const COLUMNS: &str = "id, track_id, user_id, created_at, updated_at";

pub struct PlayEventRepo;

impl PlayEventRepo {
    /// Record a playback: insert the event and bump the track's play
    /// counter in one transaction.
    pub async fn record(
        pool: &PgPool,
        track_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<PlayEvent, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO play_events (track_id, user_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, PlayEvent>(&query)
            .bind(track_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE tracks SET total_plays = total_plays + 1 WHERE id = $1")
            .bind(track_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Track ids of a user's most recent plays, newest first. Used as the
    /// listening history sent to the marketing delegate.
    pub async fn recent_track_ids_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT track_id FROM play_events
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(track_id,)| track_id).collect())
    }

    /// Count plays recorded for a track.
    pub async fn count_for_track(pool: &PgPool, track_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM play_events WHERE track_id = $1")
                .bind(track_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
