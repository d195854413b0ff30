//! Repository for the `pod_orders` table.
//!
//! Status writes are conditional updates guarded on the expected current
//! status, so concurrent writers and redelivered optimization triggers
//! cannot move an order backwards or apply a transition twice.

use sqlx::PgPool;
use waxwing_core::order::{OrderStatus, POD_COST_EURO, PROVIDER_AWAITING_OPTIMIZATION};
use waxwing_core::types::DbId;

use crate::models::pod_order::{CreatePodOrder, PodOrder};

/// Shared column list; keeps SELECT and RETURNING aligned with the row type.
const COLUMNS: &str = "id, user_id, track_id, status_id, cost_euro, shipping_address, \
                        tracking_number, provider_id, estimated_delivery_eta, \
                        created_at, updated_at";

pub struct PodOrderRepo;

impl PodOrderRepo {
    /// Insert a new order in `pending` with the fixed at-cost price and the
    /// awaiting-optimization provider sentinel. Caller input never reaches
    /// the cost or provider columns.
    pub async fn create(pool: &PgPool, input: &CreatePodOrder) -> Result<PodOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO pod_orders
                (user_id, track_id, status_id, cost_euro, shipping_address, provider_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PodOrder>(&query)
            .bind(input.user_id)
            .bind(input.track_id)
            .bind(OrderStatus::Pending.id())
            .bind(POD_COST_EURO)
            .bind(&input.shipping_address)
            .bind(PROVIDER_AWAITING_OPTIMIZATION)
            .fetch_one(pool)
            .await
    }

    /// Find an order by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PodOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pod_orders WHERE id = $1");
        sqlx::query_as::<_, PodOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's orders, most recent first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<PodOrder>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM pod_orders WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, PodOrder>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Record a successful optimization: `pending -> processing` with the
    /// selected provider and delivery estimate.
    ///
    /// Guarded on `pending` so a redelivered trigger is a no-op. Returns
    /// `true` if this call performed the transition.
    pub async fn mark_processing(
        pool: &PgPool,
        id: DbId,
        provider_id: &str,
        estimated_delivery_eta: &str,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE pod_orders SET
                status_id = $2,
                provider_id = $3,
                estimated_delivery_eta = $4
             WHERE id = $1 AND status_id = $5",
        )
        .bind(id)
        .bind(OrderStatus::Processing.id())
        .bind(provider_id)
        .bind(estimated_delivery_eta)
        .bind(OrderStatus::Pending.id())
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Record a failed optimization: `pending -> ia_optimization_failed`
    /// with the given provider sentinel. Terminal; no automatic retry ever
    /// picks these up.
    ///
    /// Guarded on `pending` so a redelivered trigger is a no-op. Returns
    /// `true` if this call performed the transition.
    pub async fn mark_optimization_failed(
        pool: &PgPool,
        id: DbId,
        provider_sentinel: &str,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE pod_orders SET
                status_id = $2,
                provider_id = $3
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(OrderStatus::IaOptimizationFailed.id())
        .bind(provider_sentinel)
        .bind(OrderStatus::Pending.id())
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Apply a fulfillment status transition as a compare-and-set from
    /// `expected` to `next`, optionally recording a tracking number.
    ///
    /// Returns `false` when the order moved since it was read; callers
    /// re-read and re-validate rather than overwrite.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        expected: OrderStatus,
        next: OrderStatus,
        tracking_number: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE pod_orders SET
                status_id = $2,
                tracking_number = COALESCE($3, tracking_number)
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(next.id())
        .bind(tracking_number)
        .bind(expected.id())
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }
}
