//! Route tree for the versioned API. Each submodule owns one resource
//! and documents its own auth requirements.

pub mod auth;
pub mod health;
pub mod order;
pub mod play;
pub mod playlist;
pub mod subscription;
pub mod track;

use axum::Router;

use crate::state::AppState;

/// Everything nested under `/api/v1`.
///
/// ```text
/// /auth           accounts and sessions
/// /tracks         catalog, search, stream URLs
/// /plays          play-event recording
/// /playlists      playlists and membership
/// /subscriptions  checkout plus the gateway webhook
/// /orders         vinyl print-on-demand
/// ```
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tracks", track::router())
        .nest("/plays", play::router())
        .nest("/playlists", playlist::router())
        .nest("/subscriptions", subscription::router())
        .nest("/orders", order::router())
}
