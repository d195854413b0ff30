//! The [`PaymentGateway`] seam and its error type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from the payment gateway client layer.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("payment gateway error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// A hosted checkout session created at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Gateway-assigned session identifier.
    pub session_id: String,
    /// URL the client is redirected to for payment.
    pub checkout_url: String,
}

/// Checkout session creation backend.
///
/// Implementations must be cheap to share (`Arc<dyn PaymentGateway>`).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a subscription checkout session for the given price.
    ///
    /// `user_ref` is echoed back by the gateway in webhook events as the
    /// client reference, which is how completed checkouts are attributed
    /// to local accounts.
    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_ref: &str,
    ) -> Result<CheckoutSession, BillingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_error_display_api() {
        let err = BillingError::Api {
            status: 402,
            body: "card declined".to_string(),
        };
        assert_eq!(err.to_string(), "payment gateway error (402): card declined");
    }

    #[test]
    fn billing_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = BillingError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
