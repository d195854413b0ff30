//! Handlers for the `/tracks` resource.
//!
//! Audio bytes never pass through this service. Registration returns a
//! write-scoped presigned URL the artist's client uploads to directly, and
//! streaming returns a short-lived read-scoped URL.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use waxwing_core::error::CoreError;
use waxwing_core::naming::TRACK_AUDIO_CONTENT_TYPE;
use waxwing_core::types::DbId;
use waxwing_db::models::track::{CreateTrack, Track};
use waxwing_db::repositories::TrackRepo;
use waxwing_events::PlatformEvent;
use waxwing_storage::{STREAM_URL_TTL, UPLOAD_URL_TTL};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireArtist, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Cap on `GET /tracks/search` results.
const SEARCH_RESULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /tracks`.
#[derive(Debug, Deserialize)]
pub struct RegisterTrackRequest {
    pub title: String,
    pub genre: Option<String>,
    pub duration_ms: Option<i32>,
    #[serde(default)]
    pub is_ai_generated: bool,
    /// Unit interval; omitted takes the platform default.
    pub royalty_rate: Option<f64>,
}

/// Response body for `POST /tracks`: the created row and where to put the audio.
#[derive(Debug, Serialize)]
pub struct RegisteredTrack {
    pub track: Track,
    /// Write-scoped presigned URL, valid for a short window.
    pub upload_url: String,
}

/// Query parameters for `GET /tracks/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Query parameters for `GET /tracks`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub artist_id: DbId,
}

/// Response body for `GET /tracks/{id}/stream`.
#[derive(Debug, Serialize)]
pub struct StreamUrl {
    /// Read-scoped presigned URL, valid for a short window.
    pub stream_url: String,
    pub metadata: StreamMetadata,
}

/// Playback metadata bundled with the stream URL.
#[derive(Debug, Serialize)]
pub struct StreamMetadata {
    pub title: String,
    pub artist_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tracks
///
/// Register a new track (artist accounts only). The storage path is derived
/// server-side from the artist and track ids; the response carries the
/// presigned upload URL for the audio file.
pub async fn register(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
    Json(input): Json<RegisterTrackRequest>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    if let Some(rate) = input.royalty_rate {
        if !(0.0..=1.0).contains(&rate) {
            return Err(AppError::Core(CoreError::Validation(
                "royalty_rate must be within [0, 1]".into(),
            )));
        }
    }

    let track = TrackRepo::create(
        &state.pool,
        &CreateTrack {
            artist_id: artist.user_id,
            title: input.title.trim().to_string(),
            genre: input.genre,
            duration_ms: input.duration_ms,
            is_ai_generated: input.is_ai_generated,
            royalty_rate: input.royalty_rate,
        },
    )
    .await?;

    let upload_url = state
        .object_store
        .sign_upload(&track.storage_path, TRACK_AUDIO_CONTENT_TYPE, UPLOAD_URL_TTL)
        .await?;

    state.event_bus.publish(PlatformEvent::TrackRegistered {
        track_id: track.id,
        artist_id: artist.user_id,
    });

    tracing::info!(
        track_id = track.id,
        artist_id = artist.user_id,
        storage_path = %track.storage_path,
        "Track registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisteredTrack { track, upload_url },
        }),
    ))
}

/// GET /api/v1/tracks/{id}
///
/// Public track metadata.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(track_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Track>>> {
    let track = TrackRepo::find_by_id(&state.pool, track_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Track",
            id: track_id,
        }))?;
    Ok(Json(DataResponse { data: track }))
}

/// GET /api/v1/tracks?artist_id={id}
///
/// Public listing of an artist's catalogue, most recent first.
pub async fn list_by_artist(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Track>>>> {
    let tracks = TrackRepo::list_by_artist(&state.pool, params.artist_id).await?;
    Ok(Json(DataResponse { data: tracks }))
}

/// GET /api/v1/tracks/search?q=
///
/// Case-insensitive title/genre substring search, capped result list.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<Track>>>> {
    let query = params.q.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("q must not be empty".into()));
    }

    let tracks = TrackRepo::search(&state.pool, query, SEARCH_RESULT_LIMIT).await?;
    Ok(Json(DataResponse { data: tracks }))
}

/// GET /api/v1/tracks/{id}/stream
///
/// Issue a read-scoped presigned URL for playback. Play accounting is a
/// separate explicit report (`POST /plays`), not a side effect of this path.
pub async fn stream(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(track_id): Path<DbId>,
) -> AppResult<Json<DataResponse<StreamUrl>>> {
    let track = TrackRepo::find_by_id(&state.pool, track_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Track",
            id: track_id,
        }))?;

    let stream_url = state
        .object_store
        .sign_download(&track.storage_path, STREAM_URL_TTL)
        .await?;

    tracing::debug!(track_id, user_id = user.user_id, "Issued stream URL");

    Ok(Json(DataResponse {
        data: StreamUrl {
            stream_url,
            metadata: StreamMetadata {
                title: track.title,
                artist_id: track.artist_id,
            },
        },
    }))
}
