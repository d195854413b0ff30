//! `/playlists`: creation and membership editing.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::playlist;
use crate::state::AppState;

/// Every route expects a bearer token; whether a non-owner may read a
/// playlist depends on its `is_public` flag and is checked per handler.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(playlist::list_mine).post(playlist::create))
        .route("/{id}", get(playlist::get_by_id))
        .route("/{id}/tracks", post(playlist::add_track))
        .route("/{id}/tracks/{track_id}", delete(playlist::remove_track))
}
