/// Account service
///
/// Registration, login and self-service profile management. Passwords are
/// hashed on the blocking pool; the hash never leaves this module except
/// into the credential store.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{ServiceError, ServiceResult};
use crate::models::now;
use crate::models::user::{NewUser, UpdateUser, User, UserProfile};
use crate::store::UserStore;

/// New account details
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub disabled: bool,
}

/// Self-service profile changes; only present fields are applied
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<Option<String>>,
    pub disabled: Option<bool>,
}

/// Login result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    token_ttl: Duration,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer, token_ttl: Duration) -> Self {
        Self {
            users,
            tokens,
            token_ttl,
        }
    }

    pub async fn register(&self, registration: Registration) -> ServiceResult<UserProfile> {
        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }
        if self
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateUsername);
        }

        let password_hash = hash_password_blocking(registration.password).await?;

        let user = User::new(NewUser {
            email: registration.email,
            username: registration.username,
            password_hash,
            full_name: registration.full_name,
            disabled: registration.disabled,
        });

        // A concurrent registration can still win the race; the store's
        // uniqueness violation maps to the same duplicate errors
        self.users.insert(&user).await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.into())
    }

    /// Authenticates by username, falling back to email, and issues a token
    pub async fn login(&self, username_or_email: &str, password: &str) -> ServiceResult<AccessToken> {
        let user = match self.users.find_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            info!("Login failed: unknown user");
            return Err(ServiceError::IncorrectCredentials);
        };

        let verified =
            match verify_password_blocking(password.to_string(), user.password_hash.clone()).await {
                Ok(verified) => verified,
                Err(e) => {
                    warn!(user_id = %user.id, error = %e, "Password verification failed");
                    false
                }
            };

        if !verified {
            info!(user_id = %user.id, "Login failed: wrong password");
            return Err(ServiceError::IncorrectCredentials);
        }

        let access_token = self.tokens.issue(&user.id.to_string(), self.token_ttl)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    pub fn profile(&self, user: &User) -> UserProfile {
        user.clone().into()
    }

    pub async fn update_profile(&self, user: &User, changes: ProfileChanges) -> ServiceResult<UserProfile> {
        let password_hash = match changes.password {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };

        let update = UpdateUser {
            email: changes.email,
            username: changes.username,
            password_hash,
            full_name: changes.full_name,
            disabled: changes.disabled,
        };

        let updated = self
            .users
            .update(user.id, &update, now())
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        info!(user_id = %updated.id, "Profile updated");
        Ok(updated.into())
    }
}
