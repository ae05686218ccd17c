//! Integration tests for the MySQL user and revoked-token repositories.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::{Duration, Utc};
use common::{create_test_user, TestDatabase};
use storefront_core::{ProfileChanges, RevokedToken, StorefrontError, UserId};
use storefront_repository::{MySqlRevokedTokenRepository, MySqlUserRepository, RevokedTokenRepository, UserRepository};

#[tokio::test]
async fn test_save_and_find_user() {
    let db = TestDatabase::new().await;
    let repo = MySqlUserRepository::new(db.pool());

    let user = create_test_user("testuser", "test@example.com");
    repo.save(&user).await.expect("Failed to save user");

    let found = repo
        .find_by_id(user.id)
        .await
        .expect("Failed to find user")
        .expect("User not found");
    assert_eq!(found.username, "testuser");
    assert_eq!(found.email.as_str(), "test@example.com");
    assert!(found.is_active);

    let by_email = repo.find_by_email("Test@Example.com").await.expect("Query failed");
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    assert!(repo.exists_by_username("testuser").await.unwrap());
    assert!(!repo.exists_by_email("nobody@example.com").await.unwrap());
    assert!(repo.find_by_id(UserId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = MySqlUserRepository::new(db.pool());

    repo.save(&create_test_user("first", "shared@example.com")).await.unwrap();
    let err = repo
        .save(&create_test_user("second", "shared@example.com"))
        .await
        .expect_err("duplicate email must fail");

    assert!(matches!(err, StorefrontError::Conflict(_)));
}

#[tokio::test]
async fn test_update_profile_and_password() {
    let db = TestDatabase::new().await;
    let repo = MySqlUserRepository::new(db.pool());

    let mut user = create_test_user("editor", "editor@example.com");
    repo.save(&user).await.unwrap();

    user.update_profile(ProfileChanges {
        bio: Some("Vintage cameras".to_string()),
        avatar: Some(Some("avatars/editor.png".to_string())),
        ..ProfileChanges::default()
    });
    user.update_password("new_hash".to_string());
    repo.update(&user).await.unwrap();

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.bio, "Vintage cameras");
    assert_eq!(found.avatar.as_deref(), Some("avatars/editor.png"));
    assert_eq!(found.password_hash, "new_hash");
}

#[tokio::test]
async fn test_revoked_tokens() {
    let db = TestDatabase::new().await;
    let users = MySqlUserRepository::new(db.pool());
    let tokens = MySqlRevokedTokenRepository::new(db.pool());

    let user = create_test_user("leaver", "leaver@example.com");
    users.save(&user).await.unwrap();

    tokens
        .revoke(&RevokedToken::new("jti-live".to_string(), user.id, Utc::now() + Duration::hours(1)))
        .await
        .unwrap();
    tokens
        .revoke(&RevokedToken::new("jti-old".to_string(), user.id, Utc::now() - Duration::hours(1)))
        .await
        .unwrap();

    assert!(tokens.is_revoked("jti-live").await.unwrap());
    assert_eq!(tokens.purge_expired().await.unwrap(), 1);
    assert!(!tokens.is_revoked("jti-old").await.unwrap());
}
