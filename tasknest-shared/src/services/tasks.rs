/// Task service
///
/// Orchestrates the read-through cache, the task store and ownership checks.
///
/// # Cache coherence
///
/// | Operation | Reads             | Purges after the store write  |
/// |-----------|-------------------|-------------------------------|
/// | list      | `tasks:{user}`    |                               |
/// | get       | `task:{id}`       |                               |
/// | create    |                   | `tasks:{user}`                |
/// | update    | store only        | `task:{id}`, `tasks:{user}`   |
/// | delete    | store only        | `task:{id}`, `tasks:{user}`   |
///
/// Purges are awaited before the operation returns, so the caller's next
/// read observes its own write. Mutations always re-read from the store to
/// check ownership against the authoritative owner.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::authorization::ensure_owner;
use crate::cache::TaskCache;
use crate::error::{ServiceError, ServiceResult};
use crate::models::now;
use crate::models::task::{NewTask, Task, UpdateTask};
use crate::models::user::User;
use crate::store::TaskStore;

/// Default page size for [`TaskService::list`]
pub const DEFAULT_LIMIT: usize = 100;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    cache: TaskCache,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, cache: TaskCache) -> Self {
        Self { store, cache }
    }

    /// Lists the user's tasks, oldest first, skipping `skip` and returning at
    /// most `limit`
    pub async fn list(&self, user: &User, skip: usize, limit: usize) -> ServiceResult<Vec<Task>> {
        let tasks = match self.cache.task_list(user.id).await {
            Some(tasks) => tasks,
            None => {
                let tasks = self.store.list_by_owner(user.id).await?;
                self.cache.store_task_list(user.id, &tasks).await;
                tasks
            }
        };

        Ok(tasks.into_iter().skip(skip).take(limit).collect())
    }

    pub async fn get(&self, user: &User, task_id: Uuid) -> ServiceResult<Task> {
        if let Some(task) = self.cache.task(task_id).await {
            ensure_owner(user, &task)?;
            return Ok(task);
        }

        let task = self.load_owned(user, task_id).await?;
        self.cache.store_task(&task).await;
        Ok(task)
    }

    pub async fn create(&self, user: &User, data: NewTask) -> ServiceResult<Task> {
        require_title(&data.title)?;

        let task = Task::new(user.id, data);
        self.store.insert(&task).await?;
        self.cache.invalidate_task_list(user.id).await;

        info!(
            task_id = %task.id,
            user_id = %user.id,
            status = task.status.as_str(),
            priority = task.priority.as_str(),
            "Task created"
        );
        Ok(task)
    }

    /// Applies the fields present in `data` and returns the stored result
    ///
    /// An update with no fields writes nothing and leaves `updated_at` as is.
    pub async fn update(&self, user: &User, task_id: Uuid, data: UpdateTask) -> ServiceResult<Task> {
        if let Some(title) = &data.title {
            require_title(title)?;
        }

        let current = self.load_owned(user, task_id).await?;
        if data.is_empty() {
            debug!(task_id = %task_id, "Empty task update");
            return Ok(current);
        }

        let task = self
            .store
            .update(task_id, &data, now())
            .await?
            .ok_or(ServiceError::NotFound)?;

        self.cache.invalidate_task(task_id).await;
        self.cache.invalidate_task_list(user.id).await;

        info!(
            task_id = %task_id,
            user_id = %user.id,
            status = task.status.as_str(),
            priority = task.priority.as_str(),
            "Task updated"
        );
        Ok(task)
    }

    pub async fn delete(&self, user: &User, task_id: Uuid) -> ServiceResult<()> {
        self.load_owned(user, task_id).await?;

        if !self.store.delete(task_id).await? {
            // Removed concurrently between the read and the delete
            debug!(task_id = %task_id, "Task already gone at delete");
            return Err(ServiceError::NotFound);
        }

        self.cache.invalidate_task(task_id).await;
        self.cache.invalidate_task_list(user.id).await;

        info!(task_id = %task_id, user_id = %user.id, "Task deleted");
        Ok(())
    }

    /// Reads a task from the store and checks `user` owns it
    async fn load_owned(&self, user: &User, task_id: Uuid) -> ServiceResult<Task> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        ensure_owner(user, &task)?;
        Ok(task)
    }
}

fn require_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::Validation("Title must not be empty".to_string()));
    }
    Ok(())
}
