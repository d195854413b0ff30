//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router with fake external services (object
//! store, prediction engine, payment gateway) injected, so tests exercise
//! the full middleware and handler stack without any network dependencies.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use waxwing_api::auth::jwt::{generate_access_token, JwtConfig};
use waxwing_api::config::{BillingConfig, ServerConfig};
use waxwing_api::router::build_app_router;
use waxwing_api::state::AppState;
use waxwing_billing::{BillingError, CheckoutSession, PaymentGateway};
use waxwing_core::types::DbId;
use waxwing_events::EventBus;
use waxwing_predict::{
    LogisticsSolution, MarketingPrediction, MarketingPredictionRequest, OrderOptimizationRequest,
    PredictError, PredictionDelegate,
};
use waxwing_storage::{ObjectStore, StorageError};

/// Service token the fake fulfillment provider authenticates with.
pub const TEST_FULFILLMENT_TOKEN: &str = "test-fulfillment-token";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a fixed JWT secret so tests can mint their own tokens.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-signing-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        ia_engine_url: "http://ia-engine.test".to_string(),
        billing: BillingConfig {
            gateway_url: "https://gateway.test".to_string(),
            secret_key: "sk_test".to_string(),
            success_url: "https://app.test/subscribe/success".to_string(),
            cancel_url: "https://app.test/subscribe/cancel".to_string(),
            price_premium_listener: "price_premium_listener_test".to_string(),
            price_artist_pro: "price_artist_pro_test".to_string(),
            price_artist_ai_plus: "price_artist_ai_plus_test".to_string(),
        },
        fulfillment_token: TEST_FULFILLMENT_TOKEN.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fake external services
// ---------------------------------------------------------------------------

/// In-memory object store that returns deterministic presigned URLs.
#[derive(Default)]
pub struct FakeObjectStore {
    /// Keys passed to `sign_upload`, in call order.
    pub uploads: Mutex<Vec<String>>,
    /// Keys passed to `sign_download`, in call order.
    pub downloads: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn sign_upload(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        self.uploads.lock().unwrap().push(key.to_string());
        Ok(format!(
            "https://uploads.test/{key}?ct={content_type}&ttl={}",
            ttl.as_secs()
        ))
    }

    async fn sign_download(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        self.downloads.lock().unwrap().push(key.to_string());
        Ok(format!("https://downloads.test/{key}?ttl={}", ttl.as_secs()))
    }
}

/// Prediction engine stub with canned answers and a failure switch.
#[derive(Default)]
pub struct FakePredictionDelegate {
    /// When set, every call returns an engine error.
    pub fail: AtomicBool,
    /// Optimization requests received, in call order.
    pub optimize_requests: Mutex<Vec<OrderOptimizationRequest>>,
    /// Propensity requests received, in call order.
    pub propensity_requests: Mutex<Vec<MarketingPredictionRequest>>,
}

impl FakePredictionDelegate {
    /// A delegate that always answers successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// A delegate whose every call fails with a 503.
    pub fn failing() -> Self {
        let delegate = Self::default();
        delegate.fail.store(true, Ordering::SeqCst);
        delegate
    }
}

#[async_trait]
impl PredictionDelegate for FakePredictionDelegate {
    async fn optimize_order(
        &self,
        request: &OrderOptimizationRequest,
    ) -> Result<LogisticsSolution, PredictError> {
        self.optimize_requests.lock().unwrap().push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(PredictError::Api {
                status: 503,
                body: "engine offline".to_string(),
            });
        }
        Ok(LogisticsSolution {
            order_id: request.order_id.clone(),
            selected_provider: "EcoVinyl_Logistics".to_string(),
            estimated_delivery_eta: "4-7 days".to_string(),
        })
    }

    async fn predict_propensity(
        &self,
        request: &MarketingPredictionRequest,
    ) -> Result<MarketingPrediction, PredictError> {
        self.propensity_requests
            .lock()
            .unwrap()
            .push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(PredictError::Api {
                status: 503,
                body: "engine offline".to_string(),
            });
        }
        Ok(MarketingPrediction {
            user_id: request.user_id.clone(),
            propensity_to_subscribe: 0.85,
            ad_segment: "High_Value_Vinyl_Buyer".to_string(),
        })
    }
}

/// Payment gateway stub that records sessions instead of creating them.
#[derive(Default)]
pub struct FakePaymentGateway {
    /// `(price_id, user_ref)` pairs passed to `create_checkout_session`.
    pub sessions: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_ref: &str,
    ) -> Result<CheckoutSession, BillingError> {
        self.sessions
            .lock()
            .unwrap()
            .push((price_id.to_string(), user_ref.to_string()));
        Ok(CheckoutSession {
            session_id: "cs_test_001".to_string(),
            checkout_url: "https://gateway.test/c/cs_test_001".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// The application under test plus handles on its fake collaborators.
pub struct TestHarness {
    pub app: Router,
    pub state: AppState,
    pub object_store: Arc<FakeObjectStore>,
    pub prediction: Arc<FakePredictionDelegate>,
    pub payments: Arc<FakePaymentGateway>,
}

/// Build the full application with fake external services, using the given
/// database pool.
///
/// This goes through [`build_app_router`] so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_harness(pool: PgPool) -> TestHarness {
    let config = test_config();
    let object_store = Arc::new(FakeObjectStore::default());
    let prediction = Arc::new(FakePredictionDelegate::new());
    let payments = Arc::new(FakePaymentGateway::default());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        object_store: object_store.clone(),
        prediction: prediction.clone(),
        payments: payments.clone(),
    };

    let app = build_app_router(state.clone(), &config);

    TestHarness {
        app,
        state,
        object_store,
        prediction,
        payments,
    }
}

/// Convenience wrapper for tests that only need the router.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_harness(pool).app
}

/// Mint a valid access token for the given user without going through login.
pub fn access_token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body without authentication.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body with a bearer token.
pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// PUT a JSON body with a bearer token.
pub async fn put_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
