//! Repository for the `users` table.
//!
//! The `is_premium` flag is the entitlement source of truth; only
//! [`UserRepo::grant_entitlement`] flips it, and only the payment webhook
//! path calls that. Login lockout bookkeeping lives here too.

use sqlx::PgPool;
use waxwing_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, SegmentUpdate, User};

/// Shared column list; keeps SELECT and RETURNING aligned with [`User`].
const COLUMNS: &str = "id, email, password_hash, role_id, artist_name, is_ai_artist, \
                        country, is_premium, subscription_id, propensity_score, ad_segment, \
                        segmented_at, is_active, last_login_at, failed_login_count, \
                        locked_until, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new account, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (email, password_hash, role_id, artist_name, is_ai_artist, country)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(&input.artist_name)
            .bind(input.is_ai_artist)
            .bind(&input.country)
            .fetch_one(pool)
            .await
    }

    /// Fetch by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch by email. Callers normalize the address before the lookup.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Read the current entitlement flag. `None` means no such user.
    pub async fn is_entitled(pool: &PgPool, id: DbId) -> Result<Option<bool>, sqlx::Error> {
        let row: Option<(bool,)> = sqlx::query_as("SELECT is_premium FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(is_premium,)| is_premium))
    }

    /// Grant premium entitlement and store the subscription reference.
    ///
    /// Idempotent: re-applying the same grant writes the same values. A
    /// `None` subscription id preserves any previously stored reference.
    /// Returns `false` if no row with the given `id` exists.
    pub async fn grant_entitlement(
        pool: &PgPool,
        id: DbId,
        subscription_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE users
             SET is_premium = true,
                 subscription_id = COALESCE($2, subscription_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(subscription_id)
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Fetch the next batch of users awaiting marketing segmentation.
    ///
    /// Non-premium active accounts only, oldest segmentation first so every
    /// user is eventually revisited.
    pub async fn segmentation_batch(pool: &PgPool, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE is_premium = false AND is_active = true
             ORDER BY segmented_at ASC NULLS FIRST, id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Record a marketing segmentation result. Returns `true` if the row
    /// was updated.
    pub async fn record_segment(
        pool: &PgPool,
        id: DbId,
        segment: &SegmentUpdate,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE users
             SET propensity_score = $2, ad_segment = $3, segmented_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(segment.propensity_score)
        .bind(&segment.ad_segment)
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Soft-deactivate an account. `false` means it was already inactive
    /// or missing.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let updated =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Bump the failed-login counter after a wrong password.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        let bump = "UPDATE users SET failed_login_count = failed_login_count + 1 WHERE id = $1";
        sqlx::query(bump).bind(id).execute(pool).await?;
        Ok(())
    }

    /// Lock the account until `until`; login rejects while the lock holds.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $1 WHERE id = $2")
            .bind(until)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Clear lockout state and stamp `last_login_at` after a good login.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
