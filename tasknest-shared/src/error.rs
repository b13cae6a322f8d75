/// Service error taxonomy
///
/// Every task and account operation fails with a [`ServiceError`]. Each
/// variant corresponds to one stable, client-visible outcome; the HTTP layer
/// maps them to status codes. Store and crypto failures keep their source so
/// they can be logged, but their detail is never shown to clients.

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::{StoreError, UniqueField};

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    /// Unknown user or wrong password; deliberately indistinguishable
    #[error("Incorrect username or password")]
    IncorrectCredentials,

    #[error("Task not found")]
    NotFound,

    /// Account removed while the request was in flight
    #[error("User not found")]
    UserNotFound,

    #[error("Not enough permissions")]
    Forbidden(#[from] AuthzError),

    /// Input rejected by a business rule
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(UniqueField::Email) => ServiceError::DuplicateEmail,
            StoreError::Conflict(UniqueField::Username) => ServiceError::DuplicateUsername,
            other => ServiceError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_map_to_duplicates() {
        assert!(matches!(
            ServiceError::from(StoreError::Conflict(UniqueField::Email)),
            ServiceError::DuplicateEmail
        ));
        assert!(matches!(
            ServiceError::from(StoreError::Conflict(UniqueField::Username)),
            ServiceError::DuplicateUsername
        ));
        assert!(matches!(
            ServiceError::from(StoreError::Unavailable("down".to_string())),
            ServiceError::Store(StoreError::Unavailable(_))
        ));
    }
}
