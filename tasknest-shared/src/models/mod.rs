/// Domain models for TaskNest
///
/// # Models
///
/// - `user`: User accounts and credential records
/// - `task`: Per-user tasks
///
/// # Example
///
/// ```
/// use tasknest_shared::models::task::{NewTask, Task, TaskPriority, TaskStatus};
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let task = Task::new(owner, NewTask {
///     title: "Write report".to_string(),
///     ..Default::default()
/// });
///
/// assert_eq!(task.status, TaskStatus::Todo);
/// assert_eq!(task.priority, TaskPriority::Medium);
/// assert_eq!(task.user_id, owner);
/// ```

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer};

pub mod task;
pub mod user;

/// Current UTC time truncated to microseconds
///
/// Postgres stores timestamps with microsecond precision, so every timestamp
/// we generate is truncated up front. A value written and read back then
/// compares equal.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Deserializes a field that distinguishes "absent" from "explicit null"
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// - field missing: `None`
/// - field `null`: `Some(None)`
/// - field set: `Some(Some(value))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
