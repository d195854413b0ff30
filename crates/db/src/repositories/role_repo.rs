//! Read access to the seeded `roles` lookup table.

use sqlx::PgPool;
use waxwing_core::types::LookupId;

use crate::models::role::Role;

pub struct RoleRepo;

impl RoleRepo {
    /// Fetch a role by name. Registration resolves `listener` and `artist`
    /// through this.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Resolve a role id to its name, `"unknown"` when the id has no row.
    pub async fn resolve_name(pool: &PgPool, role_id: LookupId) -> Result<String, sqlx::Error> {
        let name: Option<(String,)> = sqlx::query_as("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(pool)
            .await?;
        Ok(name.map_or_else(|| "unknown".to_string(), |(n,)| n))
    }
}
