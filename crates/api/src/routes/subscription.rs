//! `/subscriptions`: checkout start and the payment gateway callback.

use axum::routing::post;
use axum::Router;

use crate::handlers::subscription;
use crate::state::AppState;

/// `/checkout` expects a bearer token. `/webhook` is unauthenticated so
/// the gateway can reach it; the handler records every event before
/// interpreting it.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(subscription::checkout))
        .route("/webhook", post(subscription::webhook))
}
