//! `users` table.

use super::parse_user_id;
use crate::{traits::UserRepository, SqlPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use storefront_core::{Email, StorefrontError, StorefrontResult, User, UserId};
use tracing::debug;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                            avatar, bio, is_active, is_staff, created_at, updated_at";

#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: Arc<dyn SqlPool>,
}

impl MySqlUserRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn SqlPool>) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> StorefrontResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool.mysql())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn count_where(&self, column: &str, value: String) -> StorefrontResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM users WHERE {column} = ?");
        Ok(sqlx::query_scalar(&sql).bind(value).fetch_one(self.pool.mysql()).await?)
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    avatar: Option<String>,
    bio: String,
    is_active: bool,
    is_staff: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StorefrontError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = parse_user_id(&row.id)?;
        Ok(Self {
            id,
            username: row.username,
            // Stored addresses were validated on the way in.
            email: Email::new_unchecked(row.email),
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            avatar: row.avatar,
            bio: row.bio,
            is_active: row.is_active,
            is_staff: row.is_staff,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> StorefrontResult<Option<User>> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> StorefrontResult<Option<User>> {
        self.find_one("email", email.to_lowercase()).await
    }

    async fn exists_by_username(&self, username: &str) -> StorefrontResult<bool> {
        Ok(self.count_where("username", username.to_owned()).await? > 0)
    }

    async fn exists_by_email(&self, email: &str) -> StorefrontResult<bool> {
        Ok(self.count_where("email", email.to_lowercase()).await? > 0)
    }

    async fn save(&self, user: &User) -> StorefrontResult<User> {
        let sql = format!("INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
        sqlx::query(&sql)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.avatar)
            .bind(&user.bio)
            .bind(user.is_active)
            .bind(user.is_staff)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(self.pool.mysql())
            .await?;

        debug!(user_id = %user.id, username = %user.username, "User inserted");
        Ok(user.clone())
    }

    /// Writes the mutable columns; username and email never change.
    async fn update(&self, user: &User) -> StorefrontResult<User> {
        let updated = sqlx::query(
            "UPDATE users SET password_hash = ?, first_name = ?, last_name = ?, avatar = ?, bio = ?, \
             is_active = ?, is_staff = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.avatar)
        .bind(&user.bio)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(self.pool.mysql())
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(StorefrontError::not_found("User", user.id));
        }
        debug!(user_id = %user.id, "User updated");
        Ok(user.clone())
    }
}
