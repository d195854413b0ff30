//! Account lifecycle handlers: register, login, refresh, logout, me.
//!
//! Login failures are counted per account and trip a timed lock; refresh
//! tokens rotate on every use. Both mechanisms live entirely in this
//! module and the session repository.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use waxwing_core::error::CoreError;
use waxwing_core::roles::{ROLE_ARTIST, ROLE_LISTENER};
use waxwing_db::models::session::CreateSession;
use waxwing_db::models::user::{CreateUser, User, UserResponse};
use waxwing_db::repositories::{RoleRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Shortest password registration accepts.
const PASSWORD_MIN_LENGTH: usize = 8;

/// Wrong-password attempts tolerated before the account locks.
const FAILED_LOGINS_BEFORE_LOCK: i32 = 5;

/// How long a tripped lock lasts.
const LOCK_MINUTES: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `POST /auth/register` body.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub password: String,
    /// Register as an artist account instead of a listener.
    #[serde(default)]
    pub is_artist: bool,
    /// Public artist name; required when `is_artist` is set.
    pub artist_name: Option<String>,
    /// Marks a fully AI-generated artist catalogue.
    #[serde(default)]
    pub is_ai_artist: bool,
    pub country: Option<String>,
}

/// `POST /auth/login` body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/refresh` body.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair handed out by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a listener or artist account. The response is the safe user
/// shape; the password hash never leaves the database layer. A duplicate
/// email surfaces as 409 through the unique constraint.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid registration: {e}")))?;
    validate_password_strength(&input.password, PASSWORD_MIN_LENGTH)
        .map_err(AppError::BadRequest)?;

    let wants_artist = input.is_artist;
    let artist_name = input
        .artist_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    if wants_artist && artist_name.is_none() {
        return Err(AppError::BadRequest(
            "artist_name is required for artist accounts".into(),
        ));
    }

    let role_name = if wants_artist { ROLE_ARTIST } else { ROLE_LISTENER };
    let role = RoleRepo::find_by_name(&state.pool, role_name)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{role_name}' is not seeded")))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_lowercase(),
            password_hash,
            role_id: role.id,
            artist_name: if wants_artist {
                artist_name.map(String::from)
            } else {
                None
            },
            is_ai_artist: wants_artist && input.is_ai_artist,
            country: input.country,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = role_name, "Account registered");

    let body = DataResponse {
        data: safe_user(user, role_name),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/v1/auth/login
///
/// Trade email + password for an access/refresh token pair. Unknown
/// email and wrong password produce the same 401 so the endpoint does
/// not leak which addresses exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();
    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        return Err(bad_credentials());
    };
    ensure_login_allowed(&user)?;

    let password_ok = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_ok {
        record_failed_attempt(&state, &user).await?;
        return Err(bad_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let response = issue_tokens(&state, user, &role_name).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a fresh pair. The presented token is
/// burned before anything else can fail, so a replayed token is dead
/// even when this request errors halfway through.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Refresh token is invalid or expired".into(),
            ))
        })?;
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account disabled".into(),
        )));
    }

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let response = issue_tokens(&state, user, &role_name).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke every session the caller holds. 204 on success.
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The caller's own account in its safe shape.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;
    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    Ok(Json(DataResponse {
        data: safe_user(user, &role_name),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bad_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Reject deactivated accounts and accounts inside a lockout window.
fn ensure_login_allowed(user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account disabled".into(),
        )));
    }
    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Too many failed attempts; try again later".into(),
            )));
        }
    }
    Ok(())
}

/// Count a wrong password and trip the lock once the threshold is hit.
async fn record_failed_attempt(state: &AppState, user: &User) -> AppResult<()> {
    UserRepo::increment_failed_login(&state.pool, user.id).await?;

    if user.failed_login_count + 1 >= FAILED_LOGINS_BEFORE_LOCK {
        let until = Utc::now() + Duration::minutes(LOCK_MINUTES);
        UserRepo::lock_account(&state.pool, user.id, until).await?;
        tracing::warn!(user_id = user.id, "Account locked after repeated failures");
    }
    Ok(())
}

/// Trim a user row down to the fields the API exposes.
fn safe_user(user: User, role: &str) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email,
        role: role.to_string(),
        role_id: user.role_id,
        artist_name: user.artist_name,
        is_ai_artist: user.is_ai_artist,
        country: user.country,
        is_premium: user.is_premium,
        created_at: user.created_at,
    }
}

/// Mint the token pair, persist the session row, and shape the response.
async fn issue_tokens(state: &AppState, user: User, role: &str) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_token, refresh_hash) = generate_refresh_token();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days),
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: safe_user(user, role),
    })
}
