//! Routes for task CRUD, filtering, and completion.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use db::models::{
    streak::StreakRecord,
    task::{CreateTask, Task, TaskFilter, TaskStats, UpdateTask},
};
use serde::{Deserialize, Serialize};
use services::services::streak::StreakService;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<TaskFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::list(&state.db.pool, user_id, &filter).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    axum::Json(payload): axum::Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let task = Task::create(&state.db.pool, user_id, &payload, Uuid::new_v4()).await?;

    tracing::info!(task_id = %task.id, user_id = %user_id, "created task");

    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::find_by_id(&state.db.pool, user_id, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    if payload.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let task = Task::update(&state.db.pool, user_id, task_id, &payload)
        .await?
        .ok_or(ApiError::NotFound("task"))?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Task::delete(&state.db.pool, user_id, task_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("task"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

/// Request body for task completion. The client sends its local calendar
/// date so day boundaries follow the device timezone; the server date is
/// the UTC fallback.
#[derive(Debug, Default, Deserialize, TS)]
pub struct CompleteTask {
    pub local_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, TS)]
pub struct CompletedTaskResponse {
    pub task: Task,
    pub streak: StreakRecord,
}

pub async fn complete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    payload: Option<axum::Json<CompleteTask>>,
) -> Result<ResponseJson<ApiResponse<CompletedTaskResponse>>, ApiError> {
    let now = Utc::now();
    let task = Task::mark_completed(&state.db.pool, user_id, task_id, now)
        .await?
        .ok_or(ApiError::NotFound("task"))?;

    let today = payload
        .and_then(|body| body.0.local_date)
        .unwrap_or_else(|| now.date_naive());
    let streak = StreakService::record_completion(&state.db.pool, user_id, today).await?;

    Ok(ResponseJson(ApiResponse::success(CompletedTaskResponse {
        task,
        streak,
    })))
}

pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<ResponseJson<ApiResponse<TaskStats>>, ApiError> {
    let stats = Task::stats(&state.db.pool, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(stats)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{task_id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{task_id}/complete", post(complete_task))
        .route("/stats", get(get_stats))
}
