//! Durable log of payment-gateway webhooks.
//!
//! A row is written the moment a webhook arrives and its `outcome` is
//! filled in afterwards, so a delivery that crashed mid-processing still
//! leaves a visible NULL-outcome trace.

use sqlx::PgPool;
use waxwing_core::types::DbId;

use crate::models::payment_event::{PaymentEvent, RecordPaymentEvent};

/// Shared column list; keeps SELECT and RETURNING aligned with the row type.
const COLUMNS: &str = "id, event_type, user_ref, subscription_id, payload, outcome, \
                        created_at, updated_at";

pub struct PaymentEventRepo;

impl PaymentEventRepo {
    /// Record an inbound event before any processing happens, returning
    /// the created row with `outcome` still NULL.
    pub async fn record(
        pool: &PgPool,
        input: &RecordPaymentEvent,
    ) -> Result<PaymentEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_events (event_type, user_ref, subscription_id, payload)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(&input.event_type)
            .bind(&input.user_ref)
            .bind(&input.subscription_id)
            .bind(&input.payload)
            .fetch_one(pool)
            .await
    }

    /// Store the processing outcome for a recorded event.
    pub async fn set_outcome(pool: &PgPool, id: DbId, outcome: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE payment_events SET outcome = $2 WHERE id = $1")
            .bind(id)
            .bind(outcome)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Find an event by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PaymentEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_events WHERE id = $1");
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events naming a user reference, most recent first.
    pub async fn list_for_user_ref(
        pool: &PgPool,
        user_ref: &str,
    ) -> Result<Vec<PaymentEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_events WHERE user_ref = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(user_ref)
            .fetch_all(pool)
            .await
    }
}
