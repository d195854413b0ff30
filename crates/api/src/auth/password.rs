//! Password hashing built on Argon2id.
//!
//! Hashes are stored as PHC strings, so the salt and the algorithm
//! parameters travel with the hash and a future parameter change only
//! affects newly set passwords.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`, not an error; `Err` means the stored hash
/// itself is unusable (malformed, unsupported parameters).
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(other) => Err(other),
    }
}

/// Reject passwords below the configured minimum length.
///
/// The `Err` message is client-facing and states the minimum.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.len() < min_length {
        Err(format!(
            "Password must be at least {min_length} characters long"
        ))
    } else {
        Ok(())
    }
}
