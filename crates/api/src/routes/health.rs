//! Liveness endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// Report process liveness and database reachability.
///
/// Always answers 200; probes read `status` to tell "up but degraded"
/// apart from "gone".
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = waxwing_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health probe could not reach the database");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Routes mounted at the server root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
