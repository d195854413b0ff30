//! Refresh-token session storage.
//!
//! A row in `user_sessions` is one logged-in device. Only the SHA-256 hash
//! of the refresh token is stored; the lookup path hashes the presented
//! token and matches on the digest. Revocation flips a flag instead of
//! deleting, which keeps the row around for auditing until cleanup runs.

use sqlx::PgPool;
use waxwing_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

/// Shared column list; keeps SELECT and RETURNING aligned with the row type.
const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                        user_agent, ip_address, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    /// Record a new logged-in session.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions
                (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Look up the live session matching a refresh token hash.
    ///
    /// Revoked and expired sessions do not match, so a stale token fails
    /// here rather than in the handler.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE refresh_token_hash = $1 AND NOT is_revoked AND expires_at > NOW()"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke one session. `false` means it was already revoked or missing.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true WHERE id = $1 AND NOT is_revoked",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Revoke every live session a user holds; the logout-everywhere
    /// endpoint calls this. Returns how many sessions were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true WHERE user_id = $1 AND NOT is_revoked",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(updated.rows_affected())
    }

    /// Purge rows no login can ever use again (expired or revoked).
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let deleted =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW() OR is_revoked")
                .execute(pool)
                .await?;
        Ok(deleted.rows_affected())
    }
}
