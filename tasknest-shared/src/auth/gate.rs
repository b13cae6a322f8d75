/// Bearer token resolution
///
/// Every protected operation starts here: the token is verified, its subject
/// is looked up in the credential store and the account must be active. The
/// user is re-read on every request, so a disabled or deleted account loses
/// access immediately even while its tokens are unexpired.

use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use super::jwt::TokenIssuer;
use crate::models::user::User;
use crate::store::{StoreError, UserStore};

/// Reasons a bearer token does not resolve to an active user
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Signature, structure or expiry check failed
    #[error("Could not validate credentials")]
    InvalidCredentials,

    /// Subject is not a known user ID
    #[error("User not found")]
    UserNotFound,

    #[error("Inactive user")]
    InactiveUser,

    /// Credential store failed while resolving the subject
    #[error("Credential store failed: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Whether the failure is attributable to the presented credential rather
    /// than to the server
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::Store(_))
    }
}

/// Resolves bearer tokens into active users
#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenIssuer,
    users: Arc<dyn UserStore>,
}

impl AuthGate {
    pub fn new(tokens: TokenIssuer, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let subject = self.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "Bearer token rejected");
            AuthError::InvalidCredentials
        })?;

        let user_id = Uuid::parse_str(&subject).map_err(|_| {
            debug!(subject = %subject, "Token subject is not a user ID");
            AuthError::UserNotFound
        })?;

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| {
                error!(user_id = %user_id, error = %e, "Failed to load user for token");
                AuthError::Store(e)
            })?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active() {
            debug!(user_id = %user.id, "Token belongs to a disabled user");
            return Err(AuthError::InactiveUser);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{NewUser, UpdateUser};
    use crate::store::memory::MemoryUserStore;
    use chrono::Duration;

    const SECRET: &str = "gate-test-secret-that-is-long-enough";

    async fn setup() -> (AuthGate, MemoryUserStore, TokenIssuer, User) {
        let store = MemoryUserStore::new();
        let user = User::new(NewUser {
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            full_name: None,
            disabled: false,
        });
        store.insert(&user).await.unwrap();

        let tokens = TokenIssuer::new(SECRET, "HS256").unwrap();
        let gate = AuthGate::new(tokens.clone(), Arc::new(store.clone()));
        (gate, store, tokens, user)
    }

    #[tokio::test]
    async fn test_resolves_active_user() {
        let (gate, _, tokens, user) = setup().await;
        let token = tokens.issue(&user.id.to_string(), Duration::minutes(5)).unwrap();

        let resolved = gate.resolve(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let (gate, _, tokens, user) = setup().await;
        let expired = tokens.issue(&user.id.to_string(), Duration::seconds(-5)).unwrap();

        assert!(matches!(
            gate.resolve(&expired).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            gate.resolve("garbage").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_subject() {
        let (gate, store, tokens, user) = setup().await;

        let malformed = tokens.issue("not-a-uuid", Duration::minutes(5)).unwrap();
        assert!(matches!(gate.resolve(&malformed).await, Err(AuthError::UserNotFound)));

        let token = tokens.issue(&user.id.to_string(), Duration::minutes(5)).unwrap();
        store.remove(user.id).await;
        assert!(matches!(gate.resolve(&token).await, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_disabled_user() {
        let (gate, store, tokens, user) = setup().await;
        let token = tokens.issue(&user.id.to_string(), Duration::minutes(5)).unwrap();

        let disable = UpdateUser {
            disabled: Some(true),
            ..Default::default()
        };
        store.update(user.id, &disable, user.updated_at).await.unwrap();

        let err = gate.resolve(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InactiveUser));
        assert!(err.is_unauthenticated());
    }

    #[test]
    fn test_store_failure_is_not_unauthenticated() {
        let err = AuthError::Store(StoreError::Unavailable("down".to_string()));
        assert!(!err.is_unauthenticated());
        assert!(AuthError::UserNotFound.is_unauthenticated());
    }
}
