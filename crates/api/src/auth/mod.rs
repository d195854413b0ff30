//! Credential primitives: Argon2id password handling in [`password`],
//! JWT minting and validation plus refresh-token hashing in [`jwt`].

pub mod jwt;
pub mod password;
