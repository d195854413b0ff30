//! Inbound webhook event envelope.
//!
//! The gateway wraps every notification in the same three-level shape:
//! an event `type`, a `data` wrapper, and the affected `object`. Every
//! field except the type is optional here so that unrecognized or partial
//! events still deserialize and can be recorded.

use serde::{Deserialize, Serialize};

/// A webhook notification from the payment gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentWebhookEvent {
    /// Event type, e.g. `"checkout.session.completed"`.
    #[serde(rename = "type", default)]
    pub event_type: String,

    #[serde(default)]
    pub data: EventData,
}

/// The `data` wrapper around the affected object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub object: EventObject,
}

/// The object the event describes. For checkout events this is the
/// session; only the fields this backend reads are modeled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventObject {
    /// Our user id, echoed back from session creation.
    #[serde(default)]
    pub client_reference_id: Option<String>,

    /// Gateway subscription identifier, present once a subscription exists.
    #[serde(default)]
    pub subscription: Option<String>,
}

impl PaymentWebhookEvent {
    /// The local user reference carried by the event, if any.
    pub fn user_ref(&self) -> Option<&str> {
        self.data.object.client_reference_id.as_deref()
    }

    /// The gateway subscription id carried by the event, if any.
    pub fn subscription_id(&self) -> Option<&str> {
        self.data.object.subscription.as_deref()
    }
}
