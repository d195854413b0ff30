//! Client for the external IA engine.
//!
//! The engine exposes two prediction endpoints: logistics optimization
//! for print-on-demand vinyl orders and marketing propensity scoring for
//! listener segmentation. [`PredictionDelegate`] is the seam the rest of
//! the backend programs against; [`HttpPredictionDelegate`] is the
//! production implementation speaking the engine's JSON contract.

pub mod delegate;
pub mod http;

pub use delegate::{
    Demographics, LogisticsSolution, MarketingPrediction, MarketingPredictionRequest,
    OrderOptimizationRequest, PredictError, PredictionDelegate,
};
pub use http::HttpPredictionDelegate;
