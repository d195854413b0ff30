//! Shared domain types and pure business rules for the Waxwing backend.
//!
//! Everything in this crate is database- and transport-free: the order
//! lifecycle graph, entitlement event classification, naming conventions,
//! and the common error type consumed by the API layer.

pub mod entitlement;
pub mod error;
pub mod naming;
pub mod order;
pub mod roles;
pub mod types;
