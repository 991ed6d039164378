//! Task routes: CRUD, status transitions, and the kanban projection

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::types::{Envelope, FieldError, TaskDto, TaskStatus};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{NewTask, TaskPatch};
use crate::repositories::ListOptions;
use crate::validation::{parse_due_date, parse_status, validate_description, validate_title};

/// Query parameters for task listing
#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub sort: Option<String>,
}

/// Request for task creation
#[derive(Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Request for a task update; absent fields are untouched
#[derive(Deserialize, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Request for a status-only transition
#[derive(Deserialize, Default)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// List the requester's tasks, optionally filtered and sorted
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut options = ListOptions::default();

    if let Some(status) = &query.status {
        options.status = Some(parse_status(status).map_err(|m| ApiError::field("status", m))?);
    }
    if let Some(sort) = &query.sort {
        let (sort_field, descending) = ListOptions::parse_sort(sort)
            .ok_or_else(|| ApiError::field("sort", "Sort must be created_at or due_date"))?;
        options.sort_field = sort_field;
        options.descending = descending;
    }

    let tasks = state.task_repository.list(auth.id, options).await?;
    let tasks: Vec<TaskDto> = tasks.iter().map(|t| t.to_dto()).collect();

    Ok(Json(Envelope::<Value>::ok(json!({
        "count": tasks.len(),
        "tasks": tasks,
    }))))
}

/// The kanban projection for the board view
pub async fn kanban(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let board = state.task_repository.kanban(auth.id).await?;
    Ok(Json(Envelope::<Value>::ok(json!({ "kanban": board }))))
}

/// Fetch a single owned task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .task_repository
        .get(auth.id, id)
        .await?
        .ok_or(ApiError::NotFound("Task not found"))?;

    Ok(Json(Envelope::<Value>::ok(
        json!({ "task": task.to_dto() }),
    )))
}

/// Create a task owned by the requester
///
/// Status defaults to pending when omitted; the due date is mandatory.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();

    if let Err(message) = validate_title(&payload.title) {
        errors.push(FieldError::new("title", message));
    }

    let description = payload.description.unwrap_or_default();
    if let Err(message) = validate_description(&description) {
        errors.push(FieldError::new("description", message));
    }

    let status = match &payload.status {
        Some(status) => match parse_status(status) {
            Ok(status) => status,
            Err(message) => {
                errors.push(FieldError::new("status", message));
                TaskStatus::Pending
            }
        },
        None => TaskStatus::Pending,
    };

    let due_date = match &payload.due_date {
        Some(due_date) => match parse_due_date(due_date) {
            Ok(due_date) => Some(due_date),
            Err(message) => {
                errors.push(FieldError::new("due_date", message));
                None
            }
        },
        None => {
            errors.push(FieldError::new("due_date", "Due date is required"));
            None
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let Some(due_date) = due_date else {
        return Err(ApiError::field("due_date", "Due date is required"));
    };

    let task = state
        .task_repository
        .create(
            auth.id,
            NewTask {
                title: payload.title.trim().to_string(),
                description,
                status,
                due_date,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::<Value>::ok_with_message(
            "Task created successfully",
            json!({ "task": task.to_dto() }),
        )),
    ))
}

/// Apply a full or partial update to an owned task
///
/// Fields explicitly present are applied, including a description set to
/// the empty string; absent fields stay as they are. Ownership is not a
/// field and cannot be updated.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();
    let mut patch = TaskPatch::default();

    if let Some(title) = payload.title {
        match validate_title(&title) {
            Ok(()) => patch.title = Some(title.trim().to_string()),
            Err(message) => errors.push(FieldError::new("title", message)),
        }
    }
    if let Some(description) = payload.description {
        match validate_description(&description) {
            Ok(()) => patch.description = Some(description),
            Err(message) => errors.push(FieldError::new("description", message)),
        }
    }
    if let Some(status) = &payload.status {
        match parse_status(status) {
            Ok(status) => patch.status = Some(status),
            Err(message) => errors.push(FieldError::new("status", message)),
        }
    }
    if let Some(due_date) = &payload.due_date {
        match parse_due_date(due_date) {
            Ok(due_date) => patch.due_date = Some(due_date),
            Err(message) => errors.push(FieldError::new("due_date", message)),
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let task = state
        .task_repository
        .update(auth.id, id, patch)
        .await?
        .ok_or(ApiError::NotFound("Task not found"))?;

    Ok(Json(Envelope::<Value>::ok_with_message(
        "Task updated successfully",
        json!({ "task": task.to_dto() }),
    )))
}

/// Status-only transition, the drag-and-drop path
///
/// The status is validated before any ownership lookup, so an invalid
/// value is a 400 that never touches the store.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let status = payload
        .status
        .as_deref()
        .ok_or_else(|| ApiError::field("status", "Status is required"))?;
    let status = parse_status(status).map_err(|m| ApiError::field("status", m))?;

    let task = state
        .task_repository
        .set_status(auth.id, id, status)
        .await?
        .ok_or(ApiError::NotFound("Task not found"))?;

    Ok(Json(Envelope::<Value>::ok_with_message(
        "Task status updated successfully",
        json!({ "task": task.to_dto() }),
    )))
}

/// Delete an owned task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let removed = state.task_repository.delete(auth.id, id).await?;
    if !removed {
        return Err(ApiError::NotFound("Task not found"));
    }

    Ok(Json(Envelope::message("Task deleted successfully")))
}
