//! Handlers for the `/plays` resource (playback accounting).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use waxwing_core::error::CoreError;
use waxwing_core::types::DbId;
use waxwing_db::repositories::{PlayEventRepo, TrackRepo};
use waxwing_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /plays`.
#[derive(Debug, Deserialize)]
pub struct RecordPlayRequest {
    pub track_id: DbId,
}

/// POST /api/v1/plays
///
/// Report a playback. Anonymous reports are accepted (no user attached);
/// authenticated ones feed the listener's history. Deliberately decoupled
/// from the stream-URL path: issuing a URL is not proof anyone listened.
pub async fn record(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
    Json(input): Json<RecordPlayRequest>,
) -> AppResult<impl IntoResponse> {
    TrackRepo::find_by_id(&state.pool, input.track_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Track",
            id: input.track_id,
        }))?;

    let user_id = user.as_ref().map(|u| u.user_id);
    let event = PlayEventRepo::record(&state.pool, input.track_id, user_id).await?;

    state.event_bus.publish(PlatformEvent::TrackPlayed {
        track_id: input.track_id,
        listener_id: user_id,
    });

    tracing::debug!(track_id = input.track_id, user_id, "Play recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}
