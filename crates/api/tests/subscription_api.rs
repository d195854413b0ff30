//! HTTP-level integration tests for checkout sessions and the payment
//! gateway webhook, including entitlement grants and redelivery.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, post_json_auth};
use sqlx::PgPool;
use waxwing_api::auth::password::hash_password;
use waxwing_db::models::user::{CreateUser, User};
use waxwing_db::repositories::{PaymentEventRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_listener(pool: &PgPool, email: &str) -> User {
    let hashed = hash_password("plays_records_9").expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hashed,
            role_id: 1,
            artist_name: None,
            is_ai_artist: false,
            country: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Build a gateway-shaped completion event naming `user_ref`.
fn completed_checkout_event(user_ref: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_live_0042",
                "client_reference_id": user_ref,
                "subscription": "sub_live_0042"
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// Checkout with a known plan returns the gateway session and maps the plan
/// to its configured price id.
#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_known_plan_creates_session(pool: PgPool) {
    let user = create_listener(&pool, "ana@example.com").await;
    let token = common::access_token_for(user.id, "listener");
    let harness = common::build_test_harness(pool);

    let body = serde_json::json!({ "plan": "premium-listener" });
    let response =
        post_json_auth(harness.app, "/api/v1/subscriptions/checkout", body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["session_id"], "cs_test_001");
    assert!(json["data"]["checkout_url"]
        .as_str()
        .unwrap()
        .starts_with("https://"));

    let sessions = harness.payments.sessions.lock().unwrap();
    assert_eq!(
        sessions.as_slice(),
        [(
            "price_premium_listener_test".to_string(),
            user.id.to_string()
        )]
    );
}

/// An unknown plan name is rejected with 400 before touching the gateway.
#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_unknown_plan_is_rejected(pool: PgPool) {
    let user = create_listener(&pool, "ana@example.com").await;
    let token = common::access_token_for(user.id, "listener");
    let harness = common::build_test_harness(pool);

    let body = serde_json::json!({ "plan": "free-forever" });
    let response =
        post_json_auth(harness.app, "/api/v1/subscriptions/checkout", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.payments.sessions.lock().unwrap().is_empty());
}

/// Checkout requires authentication.
#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "plan": "premium-listener" });
    let response = post_json(app, "/api/v1/subscriptions/checkout", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

/// A completed checkout grants the named user premium and records the event
/// with an `applied` outcome.
#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_checkout_grants_entitlement(pool: PgPool) {
    let user = create_listener(&pool, "ana@example.com").await;
    assert!(!user.is_premium);

    let app = common::build_test_app(pool.clone());
    let event = completed_checkout_event(&user.id.to_string());
    let response = post_json(app, "/api/v1/subscriptions/webhook", event).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["received"], true);

    let refreshed = UserRepo::find_by_id(&pool, user.id)
        .await
        .expect("lookup should succeed")
        .expect("user should exist");
    assert!(refreshed.is_premium);
    assert_eq!(refreshed.subscription_id.as_deref(), Some("sub_live_0042"));

    let events = PaymentEventRepo::list_for_user_ref(&pool, &user.id.to_string())
        .await
        .expect("event listing should succeed");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "checkout.session.completed");
    assert_eq!(events[0].outcome.as_deref(), Some("applied"));
}

/// Redelivering the same completion is acknowledged without changing state.
#[sqlx::test(migrations = "../../db/migrations")]
async fn redelivered_completion_is_idempotent(pool: PgPool) {
    let user = create_listener(&pool, "ana@example.com").await;
    let event = completed_checkout_event(&user.id.to_string());

    let app = common::build_test_app(pool.clone());
    let first = post_json(app, "/api/v1/subscriptions/webhook", event.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let second = post_json(app, "/api/v1/subscriptions/webhook", event).await;
    assert_eq!(second.status(), StatusCode::OK);

    let refreshed = UserRepo::find_by_id(&pool, user.id)
        .await
        .expect("lookup should succeed")
        .expect("user should exist");
    assert!(refreshed.is_premium);

    // Both deliveries are on the ledger, the second marked as a no-op.
    let events = PaymentEventRepo::list_for_user_ref(&pool, &user.id.to_string())
        .await
        .expect("event listing should succeed");
    assert_eq!(events.len(), 2);
    let outcomes: Vec<_> = events
        .iter()
        .map(|e| e.outcome.as_deref().unwrap_or_default())
        .collect();
    assert!(outcomes.contains(&"applied"));
    assert!(outcomes.contains(&"already_entitled"));
}

/// A completion without a client reference is acknowledged and recorded as
/// unappliable.
#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_without_user_ref_is_acknowledged(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let event = serde_json::json!({
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_live_0099" } }
    });
    let response = post_json(app, "/api/v1/subscriptions/webhook", event).await;

    assert_eq!(response.status(), StatusCode::OK);

    let record = PaymentEventRepo::find_by_id(&pool, 1)
        .await
        .expect("lookup should succeed")
        .expect("event should be recorded");
    assert_eq!(record.outcome.as_deref(), Some("missing_user_ref"));
}

/// A completion naming an unknown user is acknowledged; nothing is granted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_for_unknown_user_is_acknowledged(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let event = completed_checkout_event("999999");
    let response = post_json(app, "/api/v1/subscriptions/webhook", event).await;

    assert_eq!(response.status(), StatusCode::OK);

    let events = PaymentEventRepo::list_for_user_ref(&pool, "999999")
        .await
        .expect("event listing should succeed");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome.as_deref(), Some("user_not_found"));
}

/// Event types outside the entitlement flow are recorded and ignored.
#[sqlx::test(migrations = "../../db/migrations")]
async fn unrelated_event_type_is_recorded_as_unhandled(pool: PgPool) {
    let user = create_listener(&pool, "ana@example.com").await;
    let app = common::build_test_app(pool.clone());

    let event = serde_json::json!({
        "type": "invoice.payment_failed",
        "data": {
            "object": {
                "client_reference_id": user.id.to_string()
            }
        }
    });
    let response = post_json(app, "/api/v1/subscriptions/webhook", event).await;

    assert_eq!(response.status(), StatusCode::OK);

    let refreshed = UserRepo::find_by_id(&pool, user.id)
        .await
        .expect("lookup should succeed")
        .expect("user should exist");
    assert!(!refreshed.is_premium, "unrelated events must not entitle");

    let events = PaymentEventRepo::list_for_user_ref(&pool, &user.id.to_string())
        .await
        .expect("event listing should succeed");
    assert_eq!(events[0].outcome.as_deref(), Some("unhandled"));
}

/// A body whose fields do not match the gateway shape is rejected with 400
/// and leaves no record behind.
#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_webhook_payload_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/subscriptions/webhook",
        serde_json::json!({ "type": 42, "data": "not an object" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let record = PaymentEventRepo::find_by_id(&pool, 1)
        .await
        .expect("lookup should succeed");
    assert!(record.is_none(), "rejected payloads are not recorded");
}
