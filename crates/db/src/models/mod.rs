//! Row structs and their insert payloads, one submodule per table.
//!
//! Rows that carry secrets (password hashes, token digests) additionally
//! define a safe response struct; the full row type stays out of API
//! serialization.

pub mod payment_event;
pub mod play_event;
pub mod playlist;
pub mod pod_order;
pub mod role;
pub mod session;
pub mod track;
pub mod user;
