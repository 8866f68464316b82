//! Routes for subtasks nested under a task.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    subtask::{CreateSubtask, Subtask, UpdateSubtask},
    task::Task,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

pub async fn list_subtasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Subtask>>>, ApiError> {
    // 404 on a foreign task rather than an empty list.
    Task::find_by_id(&state.db.pool, user_id, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;

    let subtasks = Subtask::find_by_task_id(&state.db.pool, user_id, task_id).await?;
    Ok(ResponseJson(ApiResponse::success(subtasks)))
}

pub async fn create_subtask(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateSubtask>,
) -> Result<ResponseJson<ApiResponse<Subtask>>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    Task::find_by_id(&state.db.pool, user_id, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;

    let subtask =
        Subtask::create(&state.db.pool, user_id, task_id, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(subtask)))
}

pub async fn update_subtask(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((_task_id, subtask_id)): Path<(Uuid, Uuid)>,
    axum::Json(payload): axum::Json<UpdateSubtask>,
) -> Result<ResponseJson<ApiResponse<Subtask>>, ApiError> {
    let subtask = Subtask::update(&state.db.pool, user_id, subtask_id, &payload)
        .await?
        .ok_or(ApiError::NotFound("subtask"))?;
    Ok(ResponseJson(ApiResponse::success(subtask)))
}

pub async fn delete_subtask(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((_task_id, subtask_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Subtask::delete(&state.db.pool, user_id, subtask_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("subtask"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/tasks/{task_id}/subtasks",
            get(list_subtasks).post(create_subtask),
        )
        .route(
            "/tasks/{task_id}/subtasks/{subtask_id}",
            axum::routing::put(update_subtask).delete(delete_subtask),
        )
}
