//! Library half of the waxwing API server.
//!
//! Everything the binary wires together lives here, which lets the
//! integration tests assemble the same router, middleware, and
//! background tasks against a test database.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod fulfillment;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
