/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: bearer token issuing and verification
/// - [`gate`]: resolves a bearer token into an active user
/// - [`authorization`]: task ownership checks
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tasknest_shared::auth::{gate::AuthGate, jwt::TokenIssuer};
/// use tasknest_shared::store::memory::MemoryUserStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenIssuer::new("a-secret-key-of-at-least-32-bytes!", "HS256")?;
/// let gate = AuthGate::new(tokens, Arc::new(MemoryUserStore::new()));
///
/// assert!(gate.resolve("not-a-token").await.is_err());
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod gate;
pub mod jwt;
pub mod password;
