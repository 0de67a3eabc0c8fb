//! Task board handlers.
//!
//! Every successful mutation is stored first and then published to all
//! live WebSocket sessions.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use teamcollab_core::error::AppError;
use teamcollab_core::types::TaskId;
use teamcollab_entity::task::Task;

use crate::dto::request::{CreateTaskRequest, UpdateTaskRequest, validate};
use crate::dto::response::OkResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.list_tasks().await?))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    validate(&req)?;

    let task = state
        .tasks
        .create_task(req.into_create(auth.user_id.clone()))
        .await?;
    state.realtime.tasks.created(task.clone());

    info!(task_id = %task.id, user_id = %auth.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<TaskId>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    validate(&req)?;

    let task = state
        .tasks
        .update_task(&id, req.into())
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    state.realtime.tasks.updated(task.clone());

    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
///
/// Only the creator or an admin may delete.
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TaskId>,
) -> Result<Json<OkResponse>, ApiError> {
    let task = state
        .tasks
        .find_task(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;

    if !task.is_created_by(&auth.user_id) && !auth.role.is_admin() {
        return Err(AppError::forbidden("Forbidden").into());
    }

    if state.tasks.delete_task(&id).await?.is_some() {
        state.realtime.tasks.deleted(id.clone());
        info!(task_id = %id, user_id = %auth.user_id, "Task deleted");
    }

    Ok(Json(OkResponse { ok: true }))
}
