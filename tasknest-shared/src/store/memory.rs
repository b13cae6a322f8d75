/// In-memory store implementations
///
/// Backed by `tokio::sync::RwLock`-guarded vectors, so records come back in
/// insertion order. Uniqueness of email and username is enforced the same way
/// the Postgres constraints enforce it. Data is lost when the process exits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, TaskStore, UniqueField, UserStore};
use crate::models::task::{Task, UpdateTask};
use crate::models::user::{UpdateUser, User};

/// In-memory credential store
///
/// Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user record (used to simulate an account deleted out of band)
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}

fn check_unique(users: &[User], skip: Option<Uuid>, email: &str, username: &str) -> StoreResult<()> {
    let others = users.iter().filter(|u| Some(u.id) != skip);
    for other in others {
        if other.email == email {
            return Err(StoreError::Conflict(UniqueField::Email));
        }
        if other.username == username {
            return Err(StoreError::Conflict(UniqueField::Username));
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        check_unique(&users, None, &user.email, &user.username)?;
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        data: &UpdateUser,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;

        let Some(index) = users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };

        let mut updated = users[index].clone();
        data.apply(&mut updated, updated_at);
        check_unique(&users, Some(id), &updated.email, &updated.username)?;

        users[index] = updated.clone();
        Ok(Some(updated))
    }
}

/// In-memory task store
///
/// Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::Query(format!("Duplicate task id {}", task.id)));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }

    async fn update(
        &self,
        id: Uuid,
        data: &UpdateTask,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        data.apply(task, updated_at);
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() != before)
    }
}
