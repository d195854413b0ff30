//! Long-running tasks the binary spawns next to the HTTP server.
//!
//! Every task takes a `CancellationToken` and winds down cleanly when
//! the server shuts down.

pub mod segmentation;
pub mod session_cleanup;
