//! Well-known roles.
//!
//! Names and ids must match the seed rows in the roles migration; user
//! fixtures reference roles by these ids without a lookup.

use crate::types::LookupId;

pub const ROLE_LISTENER: &str = "listener";
pub const ROLE_ARTIST: &str = "artist";

pub const ROLE_ID_LISTENER: LookupId = 1;
pub const ROLE_ID_ARTIST: LookupId = 2;
