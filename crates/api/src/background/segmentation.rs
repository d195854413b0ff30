//! Periodic marketing segmentation of non-premium accounts.
//!
//! Spawns a background task that sweeps active free-tier users, asks the
//! prediction engine for their subscription propensity, and writes the score
//! and ad segment back onto the user row. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use waxwing_db::models::user::SegmentUpdate;
use waxwing_db::repositories::{PlayEventRepo, UserRepo};
use waxwing_predict::{Demographics, MarketingPredictionRequest, PredictionDelegate};

/// Default sweep cadence: once a day.
const DEFAULT_INTERVAL_SECS: u64 = 86_400;

/// Users scored per sweep. Rows come back least-recently-segmented first,
/// so successive sweeps rotate through the whole base.
const SEGMENTATION_BATCH_SIZE: i64 = 1000;

/// Play history depth sent to the prediction engine per user.
const LISTENING_HISTORY_LIMIT: i64 = 50;

/// Country feature fallback for users who never set one.
const DEFAULT_COUNTRY: &str = "ES";

/// Run the marketing segmentation loop.
///
/// Scores up to [`SEGMENTATION_BATCH_SIZE`] users per tick. The cadence is
/// configurable via `SEGMENTATION_INTERVAL_SECS`. Runs until `cancel` is
/// triggered.
pub async fn run(pool: PgPool, prediction: Arc<dyn PredictionDelegate>, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("SEGMENTATION_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(
        interval_secs,
        batch_size = SEGMENTATION_BATCH_SIZE,
        "Marketing segmentation job started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Marketing segmentation job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, prediction.as_ref()).await {
                    Ok((scored, failed)) => {
                        if scored > 0 || failed > 0 {
                            tracing::info!(scored, failed, "Marketing segmentation sweep finished");
                        } else {
                            tracing::debug!("Marketing segmentation: no users to score");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Marketing segmentation sweep failed");
                    }
                }
            }
        }
    }
}

/// Score one batch of users. Returns `(scored, failed)` counts.
///
/// A failure against a single user (engine call or write-back) is logged and
/// skipped; the user stays at the front of the next sweep because
/// `segmented_at` was never touched. Only the batch query itself aborts the
/// sweep.
pub async fn sweep(
    pool: &PgPool,
    prediction: &dyn PredictionDelegate,
) -> Result<(u64, u64), sqlx::Error> {
    let batch = UserRepo::segmentation_batch(pool, SEGMENTATION_BATCH_SIZE).await?;

    let mut scored: u64 = 0;
    let mut failed: u64 = 0;

    for user in batch {
        match score_user(pool, prediction, user.id, user.country.as_deref()).await {
            Ok(()) => scored += 1,
            Err(e) => {
                tracing::warn!(error = %e, user_id = user.id, "Failed to segment user, skipping");
                failed += 1;
            }
        }
    }

    Ok((scored, failed))
}

/// Fetch one user's listening history, score them, and persist the segment.
async fn score_user(
    pool: &PgPool,
    prediction: &dyn PredictionDelegate,
    user_id: waxwing_core::types::DbId,
    country: Option<&str>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let track_ids =
        PlayEventRepo::recent_track_ids_for_user(pool, user_id, LISTENING_HISTORY_LIMIT).await?;

    let request = MarketingPredictionRequest {
        user_id: user_id.to_string(),
        listening_history: track_ids.iter().map(ToString::to_string).collect(),
        demographics: Demographics {
            country: country.unwrap_or(DEFAULT_COUNTRY).to_string(),
        },
    };

    let outcome = prediction.predict_propensity(&request).await?;

    UserRepo::record_segment(
        pool,
        user_id,
        &SegmentUpdate {
            propensity_score: outcome.propensity_to_subscribe,
            ad_segment: outcome.ad_segment,
        },
    )
    .await?;

    Ok(())
}
