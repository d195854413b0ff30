//! Payment-gateway webhook event log model and DTOs.
//!
//! Every inbound webhook event is recorded here before any entitlement
//! write is attempted, so the gateway's retries always land on a durable
//! record of what was received and how it was handled.

use serde::Serialize;
use sqlx::FromRow;
use waxwing_core::types::{DbId, Timestamp};

/// A row from the `payment_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentEvent {
    pub id: DbId,
    pub event_type: String,
    /// Client reference naming the user, when the gateway supplied one.
    pub user_ref: Option<String>,
    pub subscription_id: Option<String>,
    /// Raw event body as received.
    pub payload: serde_json::Value,
    /// How the event was handled: `applied`, `already_entitled`,
    /// `missing_user_ref`, `user_not_found`, `unhandled`, or `apply_failed`.
    /// NULL until processing finishes.
    pub outcome: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an inbound event prior to processing.
#[derive(Debug, Clone)]
pub struct RecordPaymentEvent {
    pub event_type: String,
    pub user_ref: Option<String>,
    pub subscription_id: Option<String>,
    pub payload: serde_json::Value,
}
