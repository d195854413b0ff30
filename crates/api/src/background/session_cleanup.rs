//! Periodic purge of dead refresh-token sessions.
//!
//! Logout and token rotation only flip `is_revoked`, and expiry is a
//! timestamp comparison, so unusable rows pile up until something deletes
//! them. This job is that something.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use waxwing_db::repositories::SessionRepo;

/// Default purge cadence: hourly.
const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Run the session purge loop until `cancel` is triggered. The cadence is
/// configurable via `SESSION_CLEANUP_INTERVAL_SECS`.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("SESSION_CLEANUP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Session cleanup job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(purged) if purged > 0 => {
                        tracing::info!(purged, "Purged dead sessions");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Session cleanup failed");
                    }
                }
            }
        }
    }
}
