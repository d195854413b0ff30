//! `/orders`: vinyl print-on-demand orders.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::order;
use crate::state::AppState;

/// Listing and reading are scoped to the caller's own orders. Placing an
/// order needs premium entitlement, and `PUT /{id}/status` accepts only
/// the fulfillment service token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(order::list_mine).post(order::place))
        .route("/{id}", get(order::get_by_id))
        .route("/{id}/status", put(order::update_status))
}
