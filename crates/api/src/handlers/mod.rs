//! Handler functions, one submodule per resource.
//!
//! Handlers own request validation and response shaping; persistence goes
//! through `waxwing_db` repositories and outbound calls go through the
//! trait objects on [`crate::state::AppState`].

pub mod auth;
pub mod order;
pub mod play;
pub mod playlist;
pub mod subscription;
pub mod track;
