//! Request extractors that gate access.
//!
//! [`auth`] turns a bearer token into an identity ([`auth::AuthUser`],
//! with [`auth::OptionalAuthUser`] for routes that also serve anonymous
//! traffic); [`rbac`] layers role, entitlement, and service-token
//! requirements on top.

pub mod auth;
pub mod rbac;
