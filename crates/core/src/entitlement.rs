//! Subscription entitlement rules.
//!
//! The durable entitlement flag lives on the user row; this module holds the
//! pure decision logic for inbound payment-gateway events so it can be
//! exercised without a database or network.

/// Payment-gateway event type that grants entitlement.
pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// What the webhook handler should do with an inbound payment event.
///
/// Events reaching this code have already passed the gateway's signature
/// verification upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDisposition {
    /// Set the named user's subscription reference and premium flag.
    GrantEntitlement {
        user_ref: String,
        subscription_id: Option<String>,
    },
    /// The event names no user. Recorded and acknowledged, never fatal: the
    /// gateway also emits sessions created outside this application.
    MissingUserRef,
    /// An event type this service does not react to.
    Unhandled,
}

/// Classify an inbound payment event.
///
/// Only `checkout.session.completed` grants entitlement. Applying a grant is
/// idempotent by construction (it always writes the same flag and reference),
/// so at-least-once delivery needs no further coordination here.
pub fn classify_payment_event(
    event_type: &str,
    user_ref: Option<&str>,
    subscription_id: Option<&str>,
) -> EventDisposition {
    if event_type != EVENT_CHECKOUT_COMPLETED {
        return EventDisposition::Unhandled;
    }
    match user_ref.filter(|r| !r.is_empty()) {
        Some(user_ref) => EventDisposition::GrantEntitlement {
            user_ref: user_ref.to_string(),
            subscription_id: subscription_id
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        },
        None => EventDisposition::MissingUserRef,
    }
}

/// Processing outcomes written back onto the durable payment-event record.
///
/// Kept as plain strings because the log is append-only and read by humans
/// and reporting queries, not by control flow.
pub mod outcome {
    /// The grant was applied and the user is now entitled.
    pub const APPLIED: &str = "applied";
    /// Redelivery of a grant the user already holds.
    pub const ALREADY_ENTITLED: &str = "already_entitled";
    /// The event named no user reference.
    pub const MISSING_USER_REF: &str = "missing_user_ref";
    /// The named user reference resolved to no account.
    pub const USER_NOT_FOUND: &str = "user_not_found";
    /// An event type this service does not react to.
    pub const UNHANDLED: &str = "unhandled";
    /// The grant failed after the event was durably recorded.
    pub const APPLY_FAILED: &str = "apply_failed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_checkout_with_user_grants_entitlement() {
        let disposition = classify_payment_event(
            EVENT_CHECKOUT_COMPLETED,
            Some("42"),
            Some("sub_1AbCdEf"),
        );
        assert_eq!(
            disposition,
            EventDisposition::GrantEntitlement {
                user_ref: "42".to_string(),
                subscription_id: Some("sub_1AbCdEf".to_string()),
            }
        );
    }

    #[test]
    fn missing_user_ref_is_a_recorded_noop() {
        assert_eq!(
            classify_payment_event(EVENT_CHECKOUT_COMPLETED, None, Some("sub_1")),
            EventDisposition::MissingUserRef
        );
        assert_eq!(
            classify_payment_event(EVENT_CHECKOUT_COMPLETED, Some(""), Some("sub_1")),
            EventDisposition::MissingUserRef
        );
    }

    #[test]
    fn other_event_types_are_unhandled() {
        assert_eq!(
            classify_payment_event("invoice.paid", Some("42"), None),
            EventDisposition::Unhandled
        );
        assert_eq!(
            classify_payment_event("", Some("42"), None),
            EventDisposition::Unhandled
        );
    }

    #[test]
    fn grant_without_subscription_id_is_still_applied() {
        let disposition = classify_payment_event(EVENT_CHECKOUT_COMPLETED, Some("42"), None);
        assert_eq!(
            disposition,
            EventDisposition::GrantEntitlement {
                user_ref: "42".to_string(),
                subscription_id: None,
            }
        );
    }
}
