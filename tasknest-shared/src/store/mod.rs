/// Credential and task store contracts
///
/// The stores are the system of record. Services talk to them only through
/// the [`UserStore`] and [`TaskStore`] traits so the backing engine can be
/// swapped without touching the business rules.
///
/// # Implementations
///
/// - [`postgres`]: sqlx-backed stores used in production
/// - [`memory`]: in-process stores for tests and local development
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tasknest_shared::store::{memory::MemoryTaskStore, TaskStore};
///
/// let tasks: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::new());
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::models::task::{Task, UpdateTask};
use crate::models::user::{UpdateUser, User};

pub mod memory;
pub mod postgres;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Field protected by a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => write!(f, "email"),
            UniqueField::Username => write!(f, "username"),
        }
    }
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Write would violate a uniqueness constraint
    #[error("Unique constraint violated on {0}")]
    Conflict(UniqueField),

    /// Store could not be reached (pool timeout, I/O, closed pool)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other query failure
    #[error("Store query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("email") {
                        return StoreError::Conflict(UniqueField::Email);
                    }
                    if constraint.contains("username") {
                        return StoreError::Conflict(UniqueField::Username);
                    }
                }
                StoreError::Query(format!("Database error: {}", db_err))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Credential store: persists user records
///
/// Implementations must enforce uniqueness of email and username and report
/// violations as [`StoreError::Conflict`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user whose ID was generated by the caller
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Applies a partial update and returns the stored result
    ///
    /// Returns `None` if the user doesn't exist.
    async fn update(
        &self,
        id: Uuid,
        data: &UpdateUser,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<User>>;

    /// Verifies the store is reachable
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Task store: persists task documents keyed by ID
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task whose ID was generated by the caller
    async fn insert(&self, task: &Task) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// All tasks owned by `user_id`, oldest first
    async fn list_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Applies a partial update and returns the stored result
    ///
    /// Returns `None` if the task doesn't exist (e.g. deleted concurrently).
    async fn update(
        &self,
        id: Uuid,
        data: &UpdateTask,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Task>>;

    /// Deletes a task, returning whether it existed
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Verifies the store is reachable
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
