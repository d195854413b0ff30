//! Account role rows.

use serde::Serialize;
use sqlx::FromRow;
use waxwing_core::types::{LookupId, Timestamp};

/// Row of the seeded `roles` lookup table (`listener`, `artist`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: LookupId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
