//! Handlers for the `/orders` resource (print-on-demand vinyl).
//!
//! Creation is deliberately fast: insert the row, publish an order-placed
//! event, return 201. The logistics optimization that picks a provider
//! runs asynchronously in [`crate::fulfillment::OrderOptimizer`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use waxwing_core::error::CoreError;
use waxwing_core::order::{validate_transition, OrderStatus};
use waxwing_core::types::DbId;
use waxwing_db::models::pod_order::{CreatePodOrder, PodOrder};
use waxwing_db::repositories::{PodOrderRepo, TrackRepo};
use waxwing_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireEntitled, RequireFulfillmentToken};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /orders`.
///
/// No price field: the at-cost amount is a server-side constant and any
/// client-supplied figure would be ignored anyway.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub track_id: DbId,
    /// Opaque address blob, stored as-is and mined for a zip code later.
    pub shipping_address: serde_json::Value,
}

/// Request body for `PUT /orders/{id}/status` (fulfillment provider only).
#[derive(Debug, Deserialize)]
pub struct FulfillmentUpdate {
    /// Target status name; only `shipped` and `delivered` are accepted.
    pub status: String,
    pub tracking_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/orders
///
/// Place a vinyl pressing order for a track (premium accounts only).
/// The order starts `pending` with the optimization sentinel as provider;
/// the order-placed event on the bus hands it to the optimizer.
pub async fn place(
    RequireEntitled(user): RequireEntitled,
    State(state): State<AppState>,
    Json(input): Json<PlaceOrderRequest>,
) -> AppResult<impl IntoResponse> {
    TrackRepo::find_by_id(&state.pool, input.track_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Track",
            id: input.track_id,
        }))?;

    if !input.shipping_address.is_object() {
        return Err(AppError::BadRequest(
            "shipping_address must be a JSON object".into(),
        ));
    }

    let order = PodOrderRepo::create(
        &state.pool,
        &CreatePodOrder {
            user_id: user.user_id,
            track_id: input.track_id,
            shipping_address: input.shipping_address,
        },
    )
    .await?;

    // Published only after the row is durable; the optimizer re-reads by id.
    state.event_bus.publish(PlatformEvent::OrderPlaced {
        order_id: order.id,
        user_id: user.user_id,
    });

    tracing::info!(
        order_id = order.id,
        user_id = user.user_id,
        track_id = input.track_id,
        "Vinyl order placed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// GET /api/v1/orders
///
/// List the authenticated user's orders, most recent first.
pub async fn list_mine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PodOrder>>>> {
    let orders = PodOrderRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/{id}
///
/// Fetch one of the authenticated user's orders. Orders belonging to other
/// users are indistinguishable from absent ones.
pub async fn get_by_id(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PodOrder>>> {
    let order = PodOrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .filter(|order| order.user_id == user.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        }))?;
    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/v1/orders/{id}/status
///
/// Fulfillment-provider status push. Only `shipped` and `delivered` can be
/// set here; the transition must move forward along the lifecycle graph and
/// is applied as a compare-and-set, so a concurrent move surfaces as 409
/// rather than a silent overwrite.
pub async fn update_status(
    _service: RequireFulfillmentToken,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
    Json(input): Json<FulfillmentUpdate>,
) -> AppResult<Json<DataResponse<PodOrder>>> {
    let next = OrderStatus::from_name(&input.status)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown order status '{}'", input.status)))?;

    if !matches!(next, OrderStatus::Shipped | OrderStatus::Delivered) {
        return Err(AppError::BadRequest(format!(
            "Fulfillment may only set 'shipped' or 'delivered', got '{}'",
            input.status
        )));
    }

    let order = PodOrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        }))?;

    let current = OrderStatus::from_id(order.status_id).ok_or_else(|| {
        AppError::InternalError(format!(
            "Order {order_id} carries unknown status id {}",
            order.status_id
        ))
    })?;

    validate_transition(current, next)?;

    let moved = PodOrderRepo::transition_status(
        &state.pool,
        order_id,
        current,
        next,
        input.tracking_number.as_deref(),
    )
    .await?;
    if !moved {
        return Err(AppError::Core(CoreError::Conflict(
            "Order status changed concurrently; re-read and retry".into(),
        )));
    }

    let order = PodOrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        }))?;

    state.event_bus.publish(PlatformEvent::OrderAdvanced {
        order_id,
        status: next,
    });

    tracing::info!(order_id, status = next.name(), "Fulfillment status applied");

    Ok(Json(DataResponse { data: order }))
}
