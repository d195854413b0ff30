//! Handlers for the `/subscriptions` resource: checkout sessions and the
//! payment-gateway webhook.
//!
//! The webhook handler records every inbound event durably BEFORE acting on
//! it, then acknowledges with 200 regardless of the processing outcome
//! (recorded on the event row). Returning an error here would only make the
//! gateway redeliver an event we have already captured.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use waxwing_billing::{CheckoutSession, PaymentWebhookEvent};
use waxwing_core::entitlement::{classify_payment_event, outcome, EventDisposition};
use waxwing_core::types::DbId;
use waxwing_db::models::payment_event::RecordPaymentEvent;
use waxwing_db::repositories::{PaymentEventRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /subscriptions/checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Public plan name (`premium-listener`, `artist-pro`, `artist-ai-plus`).
    pub plan: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/subscriptions/checkout
///
/// Create a payment-gateway checkout session for the authenticated user.
/// The plan name is mapped server-side to a configured price id; the user's
/// id travels as the client reference so the completion webhook can name
/// them back.
pub async fn checkout(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<Json<DataResponse<CheckoutSession>>> {
    let price_id = state
        .config
        .billing
        .price_for_plan(&input.plan)
        .ok_or_else(|| {
            AppError::BadRequest(format!("Unknown subscription plan '{}'", input.plan))
        })?
        .to_string();

    let session = state
        .payments
        .create_checkout_session(&price_id, &user.user_id.to_string())
        .await?;

    tracing::info!(
        user_id = user.user_id,
        plan = %input.plan,
        session_id = %session.session_id,
        "Checkout session created"
    );

    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/subscriptions/webhook
///
/// Ingest a pre-verified payment-gateway event. Signature verification
/// happens upstream (gateway SDK / edge); this handler trusts the payload.
///
/// Flow: durably record the raw event, classify it, apply the entitlement
/// grant when applicable, stamp the outcome onto the record, ack 200.
pub async fn webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<serde_json::Value>> {
    let event: PaymentWebhookEvent = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook payload: {e}")))?;

    // Durable record first. If this insert fails the gateway gets a 5xx and
    // redelivers; nothing has been applied yet.
    let record = PaymentEventRepo::record(
        &state.pool,
        &RecordPaymentEvent {
            event_type: event.event_type.clone(),
            user_ref: event.user_ref().map(str::to_string),
            subscription_id: event.subscription_id().map(str::to_string),
            payload,
        },
    )
    .await?;

    let disposition =
        classify_payment_event(&event.event_type, event.user_ref(), event.subscription_id());

    let outcome = match disposition {
        EventDisposition::GrantEntitlement {
            user_ref,
            subscription_id,
        } => apply_entitlement(&state, &user_ref, subscription_id.as_deref()).await,
        EventDisposition::MissingUserRef => {
            tracing::warn!(
                payment_event_id = record.id,
                event_type = %event.event_type,
                "Payment event names no user reference, nothing to apply"
            );
            outcome::MISSING_USER_REF
        }
        EventDisposition::Unhandled => {
            tracing::debug!(
                payment_event_id = record.id,
                event_type = %event.event_type,
                "Ignoring unhandled payment event type"
            );
            outcome::UNHANDLED
        }
    };

    PaymentEventRepo::set_outcome(&state.pool, record.id, outcome).await?;

    Ok(Json(serde_json::json!({ "received": true })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply an entitlement grant, returning the outcome to stamp on the event
/// record. Never returns an error: failures are logged and reported as an
/// outcome, not bubbled into the webhook response.
async fn apply_entitlement(
    state: &AppState,
    user_ref: &str,
    subscription_id: Option<&str>,
) -> &'static str {
    let user_id: DbId = match user_ref.parse() {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(user_ref, "Payment event user reference is not a valid id");
            return outcome::USER_NOT_FOUND;
        }
    };

    let already_entitled = match UserRepo::is_entitled(&state.pool, user_id).await {
        Ok(Some(flag)) => flag,
        Ok(None) => {
            tracing::warn!(user_id, "Payment event names an unknown user");
            return outcome::USER_NOT_FOUND;
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "Entitlement lookup failed");
            return outcome::APPLY_FAILED;
        }
    };

    // Re-apply even when already entitled so a changed subscription
    // reference is picked up; the write is idempotent.
    match UserRepo::grant_entitlement(&state.pool, user_id, subscription_id).await {
        Ok(true) if already_entitled => {
            tracing::debug!(user_id, "Entitlement grant redelivered, state unchanged");
            outcome::ALREADY_ENTITLED
        }
        Ok(true) => {
            tracing::info!(user_id, "Premium entitlement granted");
            outcome::APPLIED
        }
        Ok(false) => {
            // The row vanished between the read and the write.
            tracing::warn!(user_id, "User disappeared while applying entitlement");
            outcome::USER_NOT_FOUND
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "Entitlement grant failed");
            outcome::APPLY_FAILED
        }
    }
}
