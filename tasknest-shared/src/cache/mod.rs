/// Read-through cache for task snapshots
///
/// The cache is a disposable projection of the task store: losing an entry
/// only costs a round-trip. Two kinds of keys exist:
///
/// ```text
/// tasks:{user_id}   full task collection of one user (JSON array)
/// task:{task_id}    a single task (JSON object)
/// ```
///
/// Both are written with a TTL (300 s by default) and purged by the task
/// service right after any write that changes what they represent.
///
/// # Failure policy
///
/// [`TaskCache`] never returns an error. A backend failure, a timeout or an
/// undecodable entry is logged and reported as a miss; a failed write or
/// purge is logged and ignored. Requests degrade to store-only behavior.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tasknest_shared::cache::{memory::MemoryCache, TaskCache};
///
/// # async fn example() {
/// let cache = TaskCache::new(Arc::new(MemoryCache::new()));
/// assert!(cache.task_list(uuid::Uuid::new_v4()).await.is_none());
/// # }
/// ```

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::task::Task;

pub mod memory;
pub mod redis;

/// Default entry lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache result type alias
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache backend errors
///
/// These never reach API callers; see the failure policy above.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Backend could not be reached or rejected the command
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Command did not complete in time
    #[error("Cache command timed out after {0:?}")]
    Timeout(Duration),
}

/// Key-value store with TTL
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> CacheResult<()>;
}

/// Key of a user's task collection
pub fn task_list_key(user_id: Uuid) -> String {
    format!("tasks:{}", user_id)
}

/// Key of a single task
pub fn task_key(task_id: Uuid) -> String {
    format!("task:{}", task_id)
}

/// Typed, failure-tolerant access to cached task snapshots
#[derive(Clone)]
pub struct TaskCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl TaskCache {
    /// Creates a cache with the default TTL
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_ttl(backend, DEFAULT_TTL)
    }

    pub fn with_ttl(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Cached collection of `user_id`'s tasks
    pub async fn task_list(&self, user_id: Uuid) -> Option<Vec<Task>> {
        self.get_json(&task_list_key(user_id)).await
    }

    pub async fn store_task_list(&self, user_id: Uuid, tasks: &[Task]) {
        self.put_json(&task_list_key(user_id), &tasks).await
    }

    pub async fn invalidate_task_list(&self, user_id: Uuid) {
        self.invalidate(&task_list_key(user_id)).await
    }

    /// Cached snapshot of a single task
    pub async fn task(&self, task_id: Uuid) -> Option<Task> {
        self.get_json(&task_key(task_id)).await
    }

    pub async fn store_task(&self, task: &Task) {
        self.put_json(&task_key(task.id), task).await
    }

    pub async fn invalidate_task(&self, task_id: Uuid) {
        self.invalidate(&task_key(task_id)).await
    }

    /// Backend reachability, for health reporting only
    pub async fn is_available(&self) -> bool {
        self.backend.ping().await.is_ok()
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Undecodable cache entry, treating as miss");
                None
            }
        }
    }

    async fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, &raw, self.ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    async fn invalidate(&self, key: &str) {
        match self.backend.delete(key).await {
            Ok(()) => debug!(key, "Cache entry invalidated"),
            Err(e) => warn!(key, error = %e, "Cache invalidation failed, entry expires by TTL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::NewTask;
    use memory::MemoryCache;

    /// Backend whose every command fails
    struct DownCache;

    #[async_trait]
    impl CacheBackend for DownCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Timeout(Duration::from_secs(2)))
        }

        async fn ping(&self) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    fn sample_task(owner: Uuid) -> Task {
        Task::new(
            owner,
            NewTask {
                title: "cached".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_key_format() {
        let id = Uuid::nil();
        assert_eq!(task_list_key(id), "tasks:00000000-0000-0000-0000-000000000000");
        assert_eq!(task_key(id), "task:00000000-0000-0000-0000-000000000000");
    }

    #[tokio::test]
    async fn test_task_snapshot_roundtrip() {
        let cache = TaskCache::new(Arc::new(MemoryCache::new()));
        let task = sample_task(Uuid::new_v4());

        assert!(cache.task(task.id).await.is_none());
        cache.store_task(&task).await;
        assert_eq!(cache.task(task.id).await, Some(task.clone()));

        cache.invalidate_task(task.id).await;
        assert!(cache.task(task.id).await.is_none());
    }

    #[tokio::test]
    async fn test_task_list_snapshot_is_per_user() {
        let cache = TaskCache::new(Arc::new(MemoryCache::new()));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let tasks = vec![sample_task(alice), sample_task(alice)];

        cache.store_task_list(alice, &tasks).await;
        assert_eq!(cache.task_list(alice).await, Some(tasks));
        assert!(cache.task_list(bob).await.is_none());

        cache.invalidate_task_list(alice).await;
        assert!(cache.task_list(alice).await.is_none());
    }

    #[tokio::test]
    async fn test_backend_failures_are_misses() {
        let cache = TaskCache::new(Arc::new(DownCache));
        let task = sample_task(Uuid::new_v4());

        cache.store_task(&task).await;
        assert!(cache.task(task.id).await.is_none());
        cache.invalidate_task(task.id).await;
        assert!(!cache.is_available().await);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let backend = Arc::new(MemoryCache::new());
        let cache = TaskCache::new(backend.clone());
        let id = Uuid::new_v4();

        backend
            .set(&task_key(id), "{not json", DEFAULT_TTL)
            .await
            .unwrap();
        assert!(cache.task(id).await.is_none());
    }
}
