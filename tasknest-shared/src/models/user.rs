/// User model
///
/// Users are the credential records behind authentication. Email and username
/// are each unique across all users. The password hash stays inside the
/// store boundary: it is never serialized and never printed.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     full_name TEXT,
///     disabled BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User account as held by the credential store
#[derive(Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, generated before insert
    pub id: Uuid,

    /// Email address (unique)
    pub email: String,

    /// Login name (unique)
    pub username: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional display name
    pub full_name: Option<String>,

    /// Disabled users cannot pass the auth gate
    pub disabled: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("disabled", &self.disabled)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Input for creating a user record
///
/// Carries the password hash, never the plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub disabled: bool,
}

/// Partial update of a user record
///
/// All fields are optional. Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,

    /// New display name (use Some(None) to clear)
    pub full_name: Option<Option<String>>,

    pub disabled: Option<bool>,
}

/// Public view of a user, without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a new user record with a fresh ID and timestamps
    pub fn new(data: NewUser) -> Self {
        let now = super::now();

        Self {
            id: Uuid::new_v4(),
            email: data.email,
            username: data.username,
            password_hash: data.password_hash,
            full_name: data.full_name,
            disabled: data.disabled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user may authenticate
    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}

impl UpdateUser {
    /// Merges the present fields into `user` and stamps `updated_at`
    pub fn apply(&self, user: &mut User, updated_at: DateTime<Utc>) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(full_name) = &self.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(disabled) = self.disabled {
            user.disabled = disabled;
        }
        user.updated_at = updated_at;
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            disabled: user.disabled,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(NewUser {
            email: "a@x.com".to_string(),
            username: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            full_name: None,
            disabled: false,
        })
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = sample_user();
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["username"], "alice");
    }

    #[test]
    fn test_debug_redacts_hash() {
        let rendered = format!("{:?}", sample_user());
        assert!(!rendered.contains("$argon2id$secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_update_user_default() {
        let update = UpdateUser::default();
        assert!(update.email.is_none());
        assert!(update.username.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.full_name.is_none());
        assert!(update.disabled.is_none());
    }

    #[test]
    fn test_update_user_apply() {
        let mut user = sample_user();
        let update = UpdateUser {
            full_name: Some(Some("Alice A.".to_string())),
            disabled: Some(true),
            ..Default::default()
        };
        let later = user.updated_at + chrono::Duration::seconds(1);
        update.apply(&mut user, later);

        assert_eq!(user.full_name.as_deref(), Some("Alice A."));
        assert!(!user.is_active());
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.updated_at, later);
    }

    #[test]
    fn test_profile_drops_hash() {
        let user = sample_user();
        let profile = UserProfile::from(user.clone());
        assert_eq!(profile.id, user.id);
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("password_hash").is_none());
    }
}
