//! The [`PredictionDelegate`] seam and the engine's wire types.
//!
//! Field names here are the engine's contract verbatim; ids cross the
//! wire as strings regardless of how they are stored locally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from the IA engine client layer.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine returned a non-2xx status code.
    #[error("IA engine error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Logistics optimization
// ---------------------------------------------------------------------------

/// Request body for `POST /logistics/optimize_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderOptimizationRequest {
    pub order_id: String,
    pub destination_zip: String,
    pub product_type: String,
}

/// Response from `POST /logistics/optimize_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsSolution {
    pub order_id: String,
    /// Cost-optimal fulfillment provider chosen by the engine.
    pub selected_provider: String,
    /// Human-readable delivery estimate, e.g. `"4-7 days"`.
    pub estimated_delivery_eta: String,
}

// ---------------------------------------------------------------------------
// Marketing propensity
// ---------------------------------------------------------------------------

/// Demographic features sent with a propensity request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demographics {
    pub country: String,
}

/// Request body for `POST /marketing/predict_propensity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingPredictionRequest {
    pub user_id: String,
    /// Recently played track ids, as strings.
    pub listening_history: Vec<String>,
    pub demographics: Demographics,
}

/// Response from `POST /marketing/predict_propensity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingPrediction {
    pub user_id: String,
    /// Conversion probability in `[0, 1]`.
    pub propensity_to_subscribe: f64,
    /// Advertising segment label, e.g. `"High_Value_Vinyl_Buyer"`.
    pub ad_segment: String,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Prediction backend for logistics and marketing decisions.
///
/// Implementations must be cheap to share (`Arc<dyn PredictionDelegate>`).
#[async_trait]
pub trait PredictionDelegate: Send + Sync {
    /// Ask the engine to pick a fulfillment provider and ETA for an order.
    async fn optimize_order(
        &self,
        request: &OrderOptimizationRequest,
    ) -> Result<LogisticsSolution, PredictError>;

    /// Ask the engine to score a listener's subscription propensity.
    async fn predict_propensity(
        &self,
        request: &MarketingPredictionRequest,
    ) -> Result<MarketingPrediction, PredictError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimization_request_serializes_with_contract_field_names() {
        let request = OrderOptimizationRequest {
            order_id: "41".to_string(),
            destination_zip: "90210".to_string(),
            product_type: "Vinyl POD".to_string(),
        };

        let value = serde_json::to_value(&request).expect("serializable");
        assert_eq!(value["order_id"], "41");
        assert_eq!(value["destination_zip"], "90210");
        assert_eq!(value["product_type"], "Vinyl POD");
    }

    #[test]
    fn logistics_solution_deserializes_from_engine_response() {
        let body = serde_json::json!({
            "order_id": "41",
            "selected_provider": "Provider_WestCoast_Optimized",
            "estimated_delivery_eta": "2 days"
        });

        let solution: LogisticsSolution = serde_json::from_value(body).expect("deserializable");
        assert_eq!(solution.selected_provider, "Provider_WestCoast_Optimized");
        assert_eq!(solution.estimated_delivery_eta, "2 days");
    }

    #[test]
    fn propensity_request_serializes_with_contract_field_names() {
        let request = MarketingPredictionRequest {
            user_id: "7".to_string(),
            listening_history: vec!["3".to_string(), "9".to_string()],
            demographics: Demographics {
                country: "ES".to_string(),
            },
        };

        let value = serde_json::to_value(&request).expect("serializable");
        assert_eq!(value["user_id"], "7");
        assert_eq!(value["listening_history"][1], "9");
        assert_eq!(value["demographics"]["country"], "ES");
    }

    #[test]
    fn marketing_prediction_deserializes_from_engine_response() {
        let body = serde_json::json!({
            "user_id": "7",
            "propensity_to_subscribe": 0.85,
            "ad_segment": "High_Value_Vinyl_Buyer"
        });

        let prediction: MarketingPrediction = serde_json::from_value(body).expect("deserializable");
        assert!((prediction.propensity_to_subscribe - 0.85).abs() < f64::EPSILON);
        assert_eq!(prediction.ad_segment, "High_Value_Vinyl_Buyer");
    }

    #[test]
    fn predict_error_display_api() {
        let err = PredictError::Api {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "IA engine error (503): overloaded");
    }

    #[test]
    fn predict_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = PredictError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
