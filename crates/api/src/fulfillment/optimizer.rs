//! Event-driven logistics optimization for POD vinyl orders.
//!
//! [`OrderOptimizer`] subscribes to the platform event bus and, for every
//! [`PlatformEvent::OrderPlaced`], asks the external optimization engine to
//! pick a logistics provider for the order. The outcome lands back on the
//! order row: `pending -> processing` with the selected provider on success,
//! or `pending -> ia_optimization_failed` with the manual-review sentinel
//! when the engine is unreachable or rejects the request.

use std::sync::Arc;

use tokio::sync::broadcast;
use waxwing_core::order::{
    destination_zip, OrderStatus, PRODUCT_TYPE_VINYL_POD, PROVIDER_MANUAL_REVIEW,
};
use waxwing_core::types::DbId;
use waxwing_db::repositories::PodOrderRepo;
use waxwing_db::DbPool;
use waxwing_events::PlatformEvent;
use waxwing_predict::{OrderOptimizationRequest, PredictionDelegate};

/// Routes freshly placed orders to a logistics provider.
///
/// The optimizer re-reads each order by id before acting, so a redelivered
/// or stale event against an already-routed order is a no-op.
pub struct OrderOptimizer {
    pool: DbPool,
    prediction: Arc<dyn PredictionDelegate>,
}

impl OrderOptimizer {
    /// Create a new optimizer with the given database pool and engine client.
    pub fn new(pool: DbPool, prediction: Arc<dyn PredictionDelegate>) -> Self {
        Self { pool, prediction }
    }

    /// Run the main consumption loop.
    ///
    /// Subscribes to the event bus via `receiver` and acts on every
    /// [`PlatformEvent::OrderPlaced`]. The loop exits when the channel is
    /// closed (i.e. the [`EventBus`](waxwing_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(PlatformEvent::OrderPlaced { order_id, .. }) => {
                    if let Err(e) = self.handle_placed(order_id).await {
                        tracing::error!(
                            error = %e,
                            order_id,
                            "Failed to process order for optimization"
                        );
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Order optimizer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, order optimizer shutting down");
                    break;
                }
            }
        }
    }

    /// Optimize a single freshly placed order.
    ///
    /// Engine failure is a domain outcome, not an error: the order moves to
    /// the manual-review branch and the returned result stays `Ok`.
    async fn handle_placed(&self, order_id: DbId) -> Result<(), sqlx::Error> {
        let Some(order) = PodOrderRepo::find_by_id(&self.pool, order_id).await? else {
            tracing::warn!(order_id, "Order vanished before optimization, skipping");
            return Ok(());
        };

        let Some(status) = OrderStatus::from_id(order.status_id) else {
            tracing::warn!(
                order_id,
                status_id = order.status_id,
                "Order carries unknown status id, skipping"
            );
            return Ok(());
        };

        // Only pending orders are eligible; anything else already went
        // through this path (event redelivery, or a fulfillment race).
        if status != OrderStatus::Pending {
            tracing::debug!(order_id, status = status.name(), "Order already routed, skipping");
            return Ok(());
        }

        let request = OrderOptimizationRequest {
            order_id: order.id.to_string(),
            destination_zip: destination_zip(&order.shipping_address),
            product_type: PRODUCT_TYPE_VINYL_POD.to_string(),
        };

        match self.prediction.optimize_order(&request).await {
            Ok(solution) => {
                let routed = PodOrderRepo::mark_processing(
                    &self.pool,
                    order.id,
                    &solution.selected_provider,
                    &solution.estimated_delivery_eta,
                )
                .await?;

                if routed {
                    tracing::info!(
                        order_id,
                        provider = %solution.selected_provider,
                        eta = %solution.estimated_delivery_eta,
                        "Order routed to logistics provider"
                    );
                } else {
                    // Lost the guarded update; someone else moved the order.
                    tracing::debug!(order_id, "Order left pending during optimization, skipping");
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    order_id,
                    "Logistics optimization failed, flagging order for manual review"
                );
                PodOrderRepo::mark_optimization_failed(&self.pool, order.id, PROVIDER_MANUAL_REVIEW)
                    .await?;
            }
        }

        Ok(())
    }
}
