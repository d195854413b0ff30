//! Integration tests for refresh-token session storage.
//!
//! Walks a session through its whole life: creation, lookup by token
//! hash, revocation (single and account-wide), and the cleanup sweep
//! that purges rows no login can use again.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use waxwing_db::models::session::CreateSession;
use waxwing_db::models::user::CreateUser;
use waxwing_db::repositories::{SessionRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role_id: 1,
            artist_name: None,
            is_ai_artist: false,
            country: None,
        },
    )
    .await
    .unwrap();
    user.id
}

fn session_in(user_id: i64, hash: &str, days: i64) -> CreateSession {
    CreateSession {
        user_id,
        refresh_token_hash: hash.to_string(),
        expires_at: Utc::now() + Duration::days(days),
        user_agent: Some("waxwing-tests/1.0".to_string()),
        ip_address: Some("203.0.113.9".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_created_session_is_found_by_hash(pool: PgPool) {
    let user_id = seed_user(&pool, "device@example.com").await;

    let created = SessionRepo::create(&pool, &session_in(user_id, "digest-alpha", 14))
        .await
        .unwrap();
    assert_eq!(created.user_id, user_id);
    assert!(!created.is_revoked);
    assert_eq!(created.user_agent.as_deref(), Some("waxwing-tests/1.0"));

    let found = SessionRepo::find_by_refresh_token_hash(&pool, "digest-alpha")
        .await
        .unwrap()
        .expect("live session should match its hash");
    assert_eq!(found.id, created.id);

    let miss = SessionRepo::find_by_refresh_token_hash(&pool, "digest-unknown")
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoked_session_no_longer_matches(pool: PgPool) {
    let user_id = seed_user(&pool, "logout@example.com").await;
    let session = SessionRepo::create(&pool, &session_in(user_id, "digest-beta", 14))
        .await
        .unwrap();

    assert!(SessionRepo::revoke(&pool, session.id).await.unwrap());
    // Second revoke is a no-op.
    assert!(!SessionRepo::revoke(&pool, session.id).await.unwrap());
    assert!(!SessionRepo::revoke(&pool, 999_999).await.unwrap());

    let after = SessionRepo::find_by_refresh_token_hash(&pool, "digest-beta")
        .await
        .unwrap();
    assert!(after.is_none(), "Revoked sessions must not satisfy a lookup");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_session_never_matches(pool: PgPool) {
    let user_id = seed_user(&pool, "stale@example.com").await;
    SessionRepo::create(&pool, &session_in(user_id, "digest-old", -1))
        .await
        .unwrap();

    let found = SessionRepo::find_by_refresh_token_hash(&pool, "digest-old")
        .await
        .unwrap();
    assert!(found.is_none(), "Expiry is enforced at lookup time");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoke_all_only_touches_one_user(pool: PgPool) {
    let target = seed_user(&pool, "everywhere@example.com").await;
    let bystander = seed_user(&pool, "bystander@example.com").await;

    SessionRepo::create(&pool, &session_in(target, "t-laptop", 14))
        .await
        .unwrap();
    SessionRepo::create(&pool, &session_in(target, "t-phone", 14))
        .await
        .unwrap();
    SessionRepo::create(&pool, &session_in(bystander, "b-phone", 14))
        .await
        .unwrap();

    let revoked = SessionRepo::revoke_all_for_user(&pool, target).await.unwrap();
    assert_eq!(revoked, 2);
    // Rerun finds nothing left to revoke.
    assert_eq!(SessionRepo::revoke_all_for_user(&pool, target).await.unwrap(), 0);

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "t-laptop")
        .await
        .unwrap()
        .is_none());
    let untouched = SessionRepo::find_by_refresh_token_hash(&pool, "b-phone")
        .await
        .unwrap();
    assert!(untouched.is_some(), "Other accounts keep their sessions");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cleanup_purges_expired_and_revoked_rows(pool: PgPool) {
    let user_id = seed_user(&pool, "sweep@example.com").await;

    let live = SessionRepo::create(&pool, &session_in(user_id, "keep-me", 14))
        .await
        .unwrap();
    SessionRepo::create(&pool, &session_in(user_id, "expired", -2))
        .await
        .unwrap();
    let revoked = SessionRepo::create(&pool, &session_in(user_id, "revoked", 14))
        .await
        .unwrap();
    SessionRepo::revoke(&pool, revoked.id).await.unwrap();

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 2);

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 1);
    let survivor = SessionRepo::find_by_refresh_token_hash(&pool, "keep-me")
        .await
        .unwrap()
        .expect("live session survives the sweep");
    assert_eq!(survivor.id, live.id);
}
