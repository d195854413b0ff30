//! HTTP implementation of [`PredictionDelegate`] using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::delegate::{
    LogisticsSolution, MarketingPrediction, MarketingPredictionRequest, OrderOptimizationRequest,
    PredictError, PredictionDelegate,
};

/// HTTP request timeout for a single engine call.
///
/// The engine is not trusted to answer promptly; callers see the timeout
/// surface as [`PredictError::Request`].
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a single IA engine instance.
pub struct HttpPredictionDelegate {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictionDelegate {
    /// Create a new client for an engine instance.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://ia-engine:8000`.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, base_url }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling; the client keeps its own timeout).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`PredictError::Api`] containing the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PredictError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PredictError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PredictError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PredictionDelegate for HttpPredictionDelegate {
    async fn optimize_order(
        &self,
        request: &OrderOptimizationRequest,
    ) -> Result<LogisticsSolution, PredictError> {
        debug!(order_id = %request.order_id, "requesting logistics optimization");

        let response = self
            .client
            .post(format!("{}/logistics/optimize_order", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn predict_propensity(
        &self,
        request: &MarketingPredictionRequest,
    ) -> Result<MarketingPrediction, PredictError> {
        debug!(user_id = %request.user_id, "requesting propensity prediction");

        let response = self
            .client
            .post(format!("{}/marketing/predict_propensity", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
