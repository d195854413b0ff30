//! Authorization extractors.
//!
//! Listing one of these as a handler parameter is what enforces the
//! access rule; there is no separate route-level configuration to keep
//! in sync. [`RequireEntitled`] reads the entitlement flag from the
//! database on every request: the store is the source of truth, not the
//! JWT snapshot, so a grant or revocation takes effect without re-login.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use waxwing_core::error::CoreError;
use waxwing_core::roles::ROLE_ARTIST;
use waxwing_db::repositories::UserRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

fn forbidden(msg: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.into()))
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Any authenticated account, either role.
///
/// Same check as [`AuthUser`]; the wrapper name keeps route signatures
/// readable next to the stricter extractors below.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(Self(user))
    }
}

/// Only accounts holding the artist role; everyone else gets 403.
pub struct RequireArtist(pub AuthUser);

impl FromRequestParts<AppState> for RequireArtist {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ARTIST {
            return Err(forbidden("Artist role required"));
        }
        Ok(Self(user))
    }
}

/// Only accounts with an active premium entitlement; free accounts get 403.
pub struct RequireEntitled(pub AuthUser);

impl FromRequestParts<AppState> for RequireEntitled {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let entitled = UserRepo::is_entitled(&state.pool, user.user_id)
            .await?
            .ok_or_else(|| unauthorized("Account no longer exists"))?;
        if !entitled {
            return Err(forbidden("Premium subscription required"));
        }
        Ok(Self(user))
    }
}

/// The static bearer token issued to the fulfillment provider.
///
/// Status pushes from the provider are service-to-service calls carrying
/// no user identity, so they authenticate with a shared token instead of
/// a JWT.
pub struct RequireFulfillmentToken;

impl FromRequestParts<AppState> for RequireFulfillmentToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        })?;

        if token != state.config.fulfillment_token {
            return Err(unauthorized("Invalid service token"));
        }
        Ok(Self)
    }
}
