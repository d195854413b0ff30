//! User account rows and their API-facing shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waxwing_core::types::{DbId, LookupId, Timestamp};

/// Full `users` row, password hash included. API responses go through
/// [`UserResponse`] so the hash and the lockout bookkeeping stay internal.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub role_id: LookupId,
    /// Public artist name; only set for artist accounts.
    pub artist_name: Option<String>,
    pub is_ai_artist: bool,
    pub country: Option<String>,
    /// True only after a confirmed payment event named this user.
    pub is_premium: bool,
    /// Payment-gateway subscription reference, set alongside `is_premium`.
    pub subscription_id: Option<String>,
    pub propensity_score: Option<f64>,
    pub ad_segment: Option<String>,
    pub segmented_at: Option<Timestamp>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What the API returns for a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    /// Resolved role name (`"listener"` or `"artist"`).
    pub role: String,
    pub role_id: LookupId,
    pub artist_name: Option<String>,
    pub is_ai_artist: bool,
    pub country: Option<String>,
    pub is_premium: bool,
    pub created_at: Timestamp,
}

/// Insert payload for registration.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role_id: LookupId,
    pub artist_name: Option<String>,
    pub is_ai_artist: bool,
    pub country: Option<String>,
}

/// Marketing segmentation result written back by the daily sweep.
#[derive(Debug, Clone)]
pub struct SegmentUpdate {
    pub propensity_score: f64,
    pub ad_segment: String,
}
