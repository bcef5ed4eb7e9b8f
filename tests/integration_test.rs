//! Integration tests for the garage backend
//!
//! These tests verify garage-core end to end: credential hashing against
//! the user store, token issuance against stored accounts, and the
//! fixed-window rate limiter under concurrent use.

use std::time::Duration;

use secrecy::SecretString;

use garage_core::auth::{hash_password, verify_password, Role, TokenConfig, TokenService};
use garage_core::store::{Database, ServiceItem, User};
use garage_core::utils::{RateLimitConfig, RateLimiter};

fn token_service() -> TokenService {
    TokenService::new(
        &SecretString::from("integration-test-secret-0123456789abcdef"),
        TokenConfig::parse("15m", "7d").unwrap(),
    )
}

// ============================================================================
// Credentials against the store
// ============================================================================

#[tokio::test]
async fn test_stored_hash_round_trip() {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let user = User::new("bob@garage.test", hash_password("hunter2hunter2").unwrap());
    db.create_user(&user).await.unwrap();

    let stored = db
        .find_user_by_email("bob@garage.test")
        .await
        .unwrap()
        .unwrap();

    assert!(verify_password("hunter2hunter2", &stored.password_hash));
    assert!(!verify_password("wrong-password", &stored.password_hash));
}

#[tokio::test]
async fn test_corrupt_stored_hash_reads_as_wrong_password() {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let user = User::new("bob@garage.test", "this-was-never-a-bcrypt-hash");
    db.create_user(&user).await.unwrap();

    let stored = db
        .find_user_by_email("bob@garage.test")
        .await
        .unwrap()
        .unwrap();
    assert!(!verify_password("anything", &stored.password_hash));
}

// ============================================================================
// Tokens minted from stored accounts
// ============================================================================

#[tokio::test]
async fn test_token_claims_match_stored_account() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let tokens = token_service();

    let user = User::new("boss@garage.test", hash_password("admin-password").unwrap())
        .with_role(Role::Admin);
    db.create_user(&user).await.unwrap();

    let access = tokens
        .sign_access(user.id, &user.email, user.role)
        .unwrap();
    let claims = tokens.verify_access(&access).unwrap();

    let stored = db.get_user(claims.sub).await.unwrap();
    assert_eq!(stored.id, user.id);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.email, stored.email);
}

#[tokio::test]
async fn test_stale_subject_is_detectable() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let tokens = token_service();

    let user = User::new("bob@garage.test", hash_password("hunter2hunter2").unwrap());
    db.create_user(&user).await.unwrap();

    let access = tokens.sign_access(user.id, &user.email, user.role).unwrap();
    db.set_user_active(user.id, false).await.unwrap();

    // The token still verifies cryptographically; the active flag on the
    // row is what the authorization gate consults.
    let claims = tokens.verify_access(&access).unwrap();
    let stored = db.get_user(claims.sub).await.unwrap();
    assert!(!stored.active);
}

// ============================================================================
// Rate limiter under concurrency
// ============================================================================

#[tokio::test]
async fn test_limiter_is_exact_under_concurrent_load() {
    let limiter = RateLimiter::new(RateLimitConfig::new(25, Duration::from_secs(60)));

    let mut handles = Vec::new();
    for _ in 0..50 {
        let limiter = limiter.clone();
        handles.push(tokio::spawn(
            async move { limiter.acquire("shared-key").await },
        ));
    }

    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap().allowed {
            allowed += 1;
        }
    }

    assert_eq!(allowed, 25);
}

// ============================================================================
// Store relations
// ============================================================================

#[tokio::test]
async fn test_deleting_service_cascades_favorites() {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let user = User::new("bob@garage.test", "hash");
    db.create_user(&user).await.unwrap();
    let service = ServiceItem::new("Oil change", "Full synthetic", 4999);
    db.create_service(&service).await.unwrap();

    db.add_favorite(user.id, service.id).await.unwrap();
    assert_eq!(db.list_favorites(user.id).await.unwrap().len(), 1);

    db.delete_service(service.id).await.unwrap();
    assert!(db.list_favorites(user.id).await.unwrap().is_empty());
}
