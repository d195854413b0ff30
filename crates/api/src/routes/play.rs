//! `/plays`: play-event recording, with or without a logged-in user.

use axum::routing::post;
use axum::Router;

use crate::handlers::play;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(play::record))
}
