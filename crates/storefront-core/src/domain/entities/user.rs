//! User entity.

use crate::domain::value_objects::Email;
use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. Products are owned by users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Unique username.
    pub username: String,

    /// Unique email address, used to log in.
    pub email: Email,

    /// Hashed password (never exposed via API).
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// First name, empty when not provided.
    pub first_name: String,

    /// Last name, empty when not provided.
    pub last_name: String,

    /// Avatar image path or URL.
    pub avatar: Option<String>,

    /// Free-form profile text.
    pub bio: String,

    /// Inactive accounts cannot log in.
    pub is_active: bool,

    /// Staff flag.
    pub is_staff: bool,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user.
    #[must_use]
    pub fn new(
        username: String,
        email: Email,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            avatar: None,
            bio: String::new(),
            is_active: true,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `"{first} {last}"` with surrounding whitespace trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Checks if the user can log in.
    #[must_use]
    pub const fn can_login(&self) -> bool {
        self.is_active
    }

    /// Updates the user's password hash.
    pub fn update_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Applies a profile update. `None` leaves a field unchanged.
    pub fn update_profile(&mut self, changes: ProfileChanges) {
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(avatar) = changes.avatar {
            self.avatar = avatar;
        }
        if let Some(bio) = changes.bio {
            self.bio = bio;
        }
        self.updated_at = Utc::now();
    }
}

/// Editable profile fields.
///
/// `avatar` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<Option<String>>,
    pub bio: Option<String>,
}

/// The owner fields embedded in product responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

impl UserSummary {
    /// Returns `"{first} {last}"` with surrounding whitespace trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "alice".to_string(),
            Email::new("alice@example.com").unwrap(),
            "hash".to_string(),
            "Alice".to_string(),
            String::new(),
        )
    }

    #[test]
    fn test_new_user_is_active() {
        let user = user();
        assert!(user.can_login());
        assert!(!user.is_staff);
        assert!(user.bio.is_empty());
    }

    #[test]
    fn test_full_name_trims() {
        let mut user = user();
        assert_eq!(user.full_name(), "Alice");
        user.last_name = "Liddell".to_string();
        assert_eq!(user.full_name(), "Alice Liddell");
        user.first_name.clear();
        assert_eq!(user.full_name(), "Liddell");
    }

    #[test]
    fn test_update_profile_partial() {
        let mut user = user();
        user.avatar = Some("avatars/a.png".to_string());
        user.update_profile(ProfileChanges {
            bio: Some("Collector".to_string()),
            ..ProfileChanges::default()
        });
        assert_eq!(user.bio, "Collector");
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.avatar.as_deref(), Some("avatars/a.png"));

        user.update_profile(ProfileChanges {
            avatar: Some(None),
            ..ProfileChanges::default()
        });
        assert!(user.avatar.is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
