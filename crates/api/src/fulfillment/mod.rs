//! Asynchronous order fulfillment.
//!
//! [`OrderOptimizer`] consumes order-placed events from the platform
//! event bus and routes each new order to a logistics provider via the
//! external optimization engine.

pub mod optimizer;

pub use optimizer::OrderOptimizer;
