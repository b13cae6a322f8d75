/// Task endpoints
///
/// Every route here sits behind bearer authentication and only ever touches
/// the caller's own tasks. Another user's task answers `403`; an unknown or
/// malformed ID answers `404`.
///
/// # Endpoints
///
/// - `GET    /api/v1/tasks?skip=0&limit=100` - List own tasks
/// - `POST   /api/v1/tasks` - Create a task
/// - `GET    /api/v1/tasks/:id` - Read one task
/// - `PUT    /api/v1/tasks/:id` - Partial update
/// - `DELETE /api/v1/tasks/:id` - Delete

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tasknest_shared::models::task::{NewTask, Task, TaskPriority, TaskStatus, UpdateTask};
use tasknest_shared::services::tasks::DEFAULT_LIMIT;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::{auth::CurrentUser, extract::ValidatedJson},
};

/// Pagination query
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: usize,

    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Create task request
///
/// Status and priority default to `todo` and `medium`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}

/// Task IDs that do not parse can never exist, so they answer 404
fn parse_task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(params) = params?;
    let tasks = state.tasks.list(&user, params.skip, params.limit).await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.tasks.create(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task_id = parse_task_id(&id)?;
    let task = state.tasks.get(&user, task_id).await?;
    Ok(Json(task))
}

/// Applies the fields present in the body
///
/// `description` and `due_date` accept `null` to clear them; absent fields
/// keep their stored value.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let task_id = parse_task_id(&id)?;
    let Json(update) = payload?;
    let task = state.tasks.update(&user, task_id, update).await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let task_id = parse_task_id(&id)?;
    state.tasks.delete(&user, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_task_id(&id.to_string()).unwrap(), id);

        let err = parse_task_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "T1", "priority": "high"}"#).unwrap();
        assert!(req.validate().is_ok());

        let task: NewTask = req.into();
        assert_eq!(task.priority, Some(TaskPriority::High));
        assert_eq!(task.status, None);
    }
}
