//! Payment gateway integration.
//!
//! Subscription money flows through an external gateway: the backend
//! creates hosted checkout sessions and reacts to the gateway's webhook
//! events. [`PaymentGateway`] is the seam handlers program against;
//! [`HttpPaymentGateway`] talks to the real gateway. [`PaymentWebhookEvent`]
//! models the inbound webhook envelope.

pub mod gateway;
pub mod http;
pub mod webhook;

pub use gateway::{BillingError, CheckoutSession, PaymentGateway};
pub use http::HttpPaymentGateway;
pub use webhook::PaymentWebhookEvent;
