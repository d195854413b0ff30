//! Handlers for the `/playlists` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use waxwing_core::error::CoreError;
use waxwing_core::types::DbId;
use waxwing_db::models::playlist::{CreatePlaylist, Playlist};
use waxwing_db::models::track::Track;
use waxwing_db::repositories::{PlaylistRepo, TrackRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /playlists`.
#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

/// Request body for `POST /playlists/{id}/tracks`.
#[derive(Debug, Deserialize)]
pub struct AddTrackRequest {
    pub track_id: DbId,
}

/// Response body for `GET /playlists/{id}`: the playlist plus its tracks in
/// position order.
#[derive(Debug, Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub tracks: Vec<Track>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/playlists
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreatePlaylistRequest>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let playlist = PlaylistRepo::create(
        &state.pool,
        &CreatePlaylist {
            user_id: user.user_id,
            name: input.name.trim().to_string(),
            is_public: input.is_public,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: playlist })))
}

/// GET /api/v1/playlists
///
/// List the authenticated user's playlists.
pub async fn list_mine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Playlist>>>> {
    let playlists = PlaylistRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: playlists }))
}

/// GET /api/v1/playlists/{id}
///
/// Fetch a playlist with its tracks in position order. Private playlists
/// belonging to other users read as absent.
pub async fn get_by_id(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(playlist_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PlaylistDetail>>> {
    let playlist = find_visible(&state, &user, playlist_id).await?;
    let tracks = PlaylistRepo::list_tracks(&state.pool, playlist_id).await?;

    Ok(Json(DataResponse {
        data: PlaylistDetail { playlist, tracks },
    }))
}

/// POST /api/v1/playlists/{id}/tracks
///
/// Append a track at the end of the playlist (owner only). Adding a track
/// twice maps to 409 via the membership unique constraint.
pub async fn add_track(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(playlist_id): Path<DbId>,
    Json(input): Json<AddTrackRequest>,
) -> AppResult<impl IntoResponse> {
    find_owned(&state, &user, playlist_id).await?;

    TrackRepo::find_by_id(&state.pool, input.track_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Track",
            id: input.track_id,
        }))?;

    let entry = PlaylistRepo::add_track(&state.pool, playlist_id, input.track_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// DELETE /api/v1/playlists/{id}/tracks/{track_id}
///
/// Remove a track from the playlist (owner only). Returns 204.
pub async fn remove_track(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((playlist_id, track_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_owned(&state, &user, playlist_id).await?;

    let removed = PlaylistRepo::remove_track(&state.pool, playlist_id, track_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Track",
            id: track_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a playlist the user may read: their own, or any public one.
async fn find_visible(
    state: &AppState,
    user: &AuthUser,
    playlist_id: DbId,
) -> AppResult<Playlist> {
    PlaylistRepo::find_by_id(&state.pool, playlist_id)
        .await?
        .filter(|p| p.user_id == user.user_id || p.is_public)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Playlist",
            id: playlist_id,
        }))
}

/// Fetch a playlist the user may modify: theirs only. Others' playlists,
/// public or not, read as absent.
async fn find_owned(state: &AppState, user: &AuthUser, playlist_id: DbId) -> AppResult<Playlist> {
    PlaylistRepo::find_by_id(&state.pool, playlist_id)
        .await?
        .filter(|p| p.user_id == user.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Playlist",
            id: playlist_id,
        }))
}
