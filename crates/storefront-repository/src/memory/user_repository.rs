//! In-memory user repository.

use super::InMemoryDatabase;
use crate::traits::UserRepository;
use async_trait::async_trait;
use std::sync::Arc;
use storefront_core::{StorefrontError, StorefrontResult, User, UserId};

/// In-memory user repository.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryUserRepository {
    /// Creates a repository over `db`.
    #[must_use]
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> StorefrontResult<Option<User>> {
        Ok(self.db.tables().read().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorefrontResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .db
            .tables()
            .read()
            .users
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> StorefrontResult<bool> {
        Ok(self.db.tables().read().users.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> StorefrontResult<bool> {
        let email = email.to_lowercase();
        Ok(self
            .db
            .tables()
            .read()
            .users
            .values()
            .any(|u| u.email.as_str() == email))
    }

    async fn save(&self, user: &User) -> StorefrontResult<User> {
        let mut tables = self.db.tables().write();
        let duplicate = tables
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if duplicate || tables.users.contains_key(&user.id) {
            return Err(StorefrontError::conflict("A user with that username or email already exists"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> StorefrontResult<User> {
        let mut tables = self.db.tables().write();
        match tables.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user.clone())
            }
            None => Err(StorefrontError::not_found("User", user.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Email;

    fn create_test_user(username: &str, email: &str) -> User {
        User::new(
            username.to_string(),
            Email::new(email).unwrap(),
            "hashed_password".to_string(),
            "Test".to_string(),
            "User".to_string(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryDatabase::new().users();
        let user = create_test_user("testuser", "test@example.com");
        repo.save(&user).await.unwrap();

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.username, "testuser");
        assert!(repo.find_by_email("TEST@example.com").await.unwrap().is_some());
        assert!(repo.exists_by_username("testuser").await.unwrap());
        assert!(!repo.exists_by_email("other@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = InMemoryDatabase::new().users();
        repo.save(&create_test_user("testuser", "a@example.com")).await.unwrap();

        let err = repo
            .save(&create_test_user("testuser", "b@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryDatabase::new().users();
        let err = repo
            .update(&create_test_user("ghost", "ghost@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
