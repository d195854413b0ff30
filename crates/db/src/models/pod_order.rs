//! POD vinyl order entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waxwing_core::types::{DbId, Timestamp};

/// A POD order row from the `pod_orders` table.
///
/// `status_id` references the `pod_order_statuses` lookup table; decode it
/// with [`waxwing_core::order::OrderStatus::from_id`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PodOrder {
    pub id: DbId,
    pub user_id: DbId,
    pub track_id: DbId,
    pub status_id: i16,
    /// Fixed at-cost price; never client-supplied.
    pub cost_euro: f64,
    /// Opaque structured shipping address, stored as received.
    pub shipping_address: serde_json::Value,
    /// Absent until the order ships.
    pub tracking_number: Option<String>,
    /// Logistics provider, or a sentinel while optimization is pending or
    /// has failed.
    pub provider_id: String,
    /// Delivery estimate as reported by the optimizer (opaque date string).
    pub estimated_delivery_eta: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for placing a new order. Status, cost, and provider sentinel are
/// assigned by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePodOrder {
    pub user_id: DbId,
    pub track_id: DbId,
    pub shipping_address: serde_json::Value,
}
