//! Shared handler state.

use std::sync::Arc;

use waxwing_billing::PaymentGateway;
use waxwing_predict::PredictionDelegate;
use waxwing_storage::ObjectStore;

use crate::config::ServerConfig;

/// What every handler can reach through `State<AppState>`.
///
/// Cloned per request, so everything inside is an `Arc` or a pool handle.
/// The outbound collaborators are trait objects; the integration tests
/// swap in fakes without rebuilding the router.
#[derive(Clone)]
pub struct AppState {
    pub pool: waxwing_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Broadcast bus the order pipeline and the optimizer talk over.
    pub event_bus: Arc<waxwing_events::EventBus>,
    /// Issues presigned upload and stream URLs.
    pub object_store: Arc<dyn ObjectStore>,
    /// IA engine client: logistics optimization and propensity scoring.
    pub prediction: Arc<dyn PredictionDelegate>,
    /// Opens checkout sessions with the payment provider.
    pub payments: Arc<dyn PaymentGateway>,
}
