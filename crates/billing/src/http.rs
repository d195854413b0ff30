//! HTTP implementation of [`PaymentGateway`] using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::gateway::{BillingError, CheckoutSession, PaymentGateway};

/// HTTP request timeout for a single gateway call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the payment gateway's REST API.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
    success_url: String,
    cancel_url: String,
}

/// Session representation in the gateway's own response body.
#[derive(Debug, Deserialize)]
struct GatewaySessionResponse {
    id: String,
    url: String,
}

impl HttpPaymentGateway {
    /// Create a new gateway client.
    ///
    /// * `base_url` - Gateway API base URL.
    /// * `secret_key` - API secret used as a bearer token.
    /// * `success_url` / `cancel_url` - Post-checkout redirect targets.
    pub fn new(
        base_url: String,
        secret_key: String,
        success_url: String,
        cancel_url: String,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url,
            secret_key,
            success_url,
            cancel_url,
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_ref: &str,
    ) -> Result<CheckoutSession, BillingError> {
        debug!(price_id, user_ref, "creating checkout session");

        let body = serde_json::json!({
            "mode": "subscription",
            "price_id": price_id,
            "quantity": 1,
            "client_reference_id": user_ref,
            "success_url": self.success_url,
            "cancel_url": self.cancel_url,
        });

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BillingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let session: GatewaySessionResponse = response.json().await?;
        Ok(CheckoutSession {
            session_id: session.id,
            checkout_url: session.url,
        })
    }
}
