//! `/tracks`: catalog registration, discovery, and stream URLs.

use axum::routing::get;
use axum::Router;

use crate::handlers::track;
use crate::state::AppState;

/// Reads are public. `POST /` needs the artist role and `/{id}/stream`
/// needs any bearer token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(track::list_by_artist).post(track::register))
        .route("/search", get(track::search))
        .route("/{id}", get(track::get_by_id))
        .route("/{id}/stream", get(track::stream))
}
