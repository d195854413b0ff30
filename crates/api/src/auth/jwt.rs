//! Access and refresh token primitives.
//!
//! Access tokens are short-lived HS256 JWTs carrying [`Claims`]. Refresh
//! tokens are opaque random strings handed to the client once; the server
//! keeps only their SHA-256 digest, so session rows leak nothing usable.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use waxwing_core::types::DbId;

/// Signing parameters and token lifetimes, shared via [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for signing and verification.
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty), `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15) and `JWT_REFRESH_EXPIRY_DAYS` (default 7).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or empty, or when a lifetime
    /// variable is set but not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET is required");
        assert!(!secret.is_empty(), "JWT_SECRET must not be blank");

        Self {
            secret,
            access_token_expiry_mins: env_i64("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_i64("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be an integer, got '{raw}'")),
        Err(_) => default,
    }
}

/// Claims carried by every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's database id.
    pub sub: DbId,
    /// Role name, `"listener"` or `"artist"`. A snapshot from login time;
    /// entitlement checks go to the database instead of trusting this.
    pub role: String,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Issue time (Unix seconds).
    pub iat: i64,
    /// Random token id, unique per issued token.
    pub jti: String,
}

/// Sign a fresh access token for the user.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = chrono::Utc::now();
    let expires_at = issued_at + Duration::minutes(config.access_token_expiry_mins);

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(config.secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &key)
}

/// Verify signature and expiry, returning the token's [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    let decoded = decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))?;
    Ok(decoded.claims)
}

/// Mint a refresh token as `(plaintext, sha256_hex)`.
///
/// The plaintext goes to the client and is never stored; lookups hash the
/// presented token and compare digests.
pub fn generate_refresh_token() -> (String, String) {
    let token = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&token);
    (token, digest)
}

/// SHA-256 hex digest of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
