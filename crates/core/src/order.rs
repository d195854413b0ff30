//! POD vinyl order lifecycle rules.
//!
//! Defines the order status enum, the forward-only transition graph, and the
//! pricing/provider sentinels shared by the API and repository layers.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::LookupId;

// ---------------------------------------------------------------------------
// Pricing and sentinel constants
// ---------------------------------------------------------------------------

/// Fixed at-cost price of a POD vinyl order, in euro.
///
/// Negative because the platform absorbs the pressing cost instead of
/// charging a market price. Set at creation time, never client-supplied.
pub const POD_COST_EURO: f64 = -18.00;

/// Product type tag sent to the logistics optimizer.
pub const PRODUCT_TYPE_VINYL_POD: &str = "Vinyl POD";

/// Provider sentinel for a freshly created order awaiting optimization.
pub const PROVIDER_AWAITING_OPTIMIZATION: &str = "pending_ia_optimization";

/// Provider sentinel set when optimization fails and a human must choose.
pub const PROVIDER_MANUAL_REVIEW: &str = "manual_review";

/// Destination zip placeholder when the shipping address carries none.
pub const ZIP_UNKNOWN: &str = "N/A";

// ---------------------------------------------------------------------------
// Status enum
// ---------------------------------------------------------------------------

/// Order lifecycle status.
///
/// Discriminants match the 1-based seed order of the `pod_order_statuses`
/// lookup table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Created, provider not yet selected.
    Pending = 1,
    /// Provider selected, awaiting shipment.
    Processing = 2,
    /// Handed to the logistics provider.
    Shipped = 3,
    /// Confirmed delivered. Terminal.
    Delivered = 4,
    /// Provider optimization failed; requires manual review. Terminal.
    IaOptimizationFailed = 5,
}

impl OrderStatus {
    /// Return the database status ID.
    pub fn id(self) -> LookupId {
        self as i16
    }

    /// Resolve a database status ID back to the enum.
    pub fn from_id(id: LookupId) -> Option<Self> {
        match id {
            1 => Some(OrderStatus::Pending),
            2 => Some(OrderStatus::Processing),
            3 => Some(OrderStatus::Shipped),
            4 => Some(OrderStatus::Delivered),
            5 => Some(OrderStatus::IaOptimizationFailed),
            _ => None,
        }
    }

    /// Stable name as stored in `pod_order_statuses.name`.
    pub fn name(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::IaOptimizationFailed => "ia_optimization_failed",
        }
    }

    /// Resolve a status name back to the enum.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "ia_optimization_failed" => Some(OrderStatus::IaOptimizationFailed),
            _ => None,
        }
    }

    /// True for states no transition may leave.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::IaOptimizationFailed
        )
    }
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from` may transition to.
///
/// The graph is forward-only; no backward edges and no skipping, except into
/// the failure branch:
/// - `pending`    -> `processing`, `ia_optimization_failed`
/// - `processing` -> `shipped`, `ia_optimization_failed`
/// - `shipped`    -> `delivered`
/// - `delivered` and `ia_optimization_failed` are terminal
pub fn valid_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::Pending => &[OrderStatus::Processing, OrderStatus::IaOptimizationFailed],
        OrderStatus::Processing => &[OrderStatus::Shipped, OrderStatus::IaOptimizationFailed],
        OrderStatus::Shipped => &[OrderStatus::Delivered],
        OrderStatus::Delivered | OrderStatus::IaOptimizationFailed => &[],
    }
}

/// Validate that moving an order from `current` to `next` is allowed.
///
/// A rejected move is a state conflict, not malformed input: the order has
/// simply advanced past (or never reached) the point where `next` applies.
pub fn validate_transition(current: OrderStatus, next: OrderStatus) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot transition order from '{}' to '{}'",
            current.name(),
            next.name()
        )))
    }
}

// ---------------------------------------------------------------------------
// Shipping address helpers
// ---------------------------------------------------------------------------

/// Extract the destination zip code from an opaque shipping address blob.
///
/// Accepts a `zip` or `zip_code` string field; anything else yields
/// [`ZIP_UNKNOWN`] so the optimizer request can still be built.
pub fn destination_zip(shipping_address: &Value) -> String {
    for key in ["zip", "zip_code"] {
        if let Some(zip) = shipping_address.get(key).and_then(Value::as_str) {
            if !zip.is_empty() {
                return zip.to_string();
            }
        }
    }
    ZIP_UNKNOWN.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
