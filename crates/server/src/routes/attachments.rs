//! Routes for attachment metadata nested under a task.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    attachment::{Attachment, CreateAttachment},
    task::Task,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

pub async fn list_attachments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Attachment>>>, ApiError> {
    Task::find_by_id(&state.db.pool, user_id, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;

    let attachments = Attachment::find_by_task_id(&state.db.pool, user_id, task_id).await?;
    Ok(ResponseJson(ApiResponse::success(attachments)))
}

pub async fn create_attachment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateAttachment>,
) -> Result<ResponseJson<ApiResponse<Attachment>>, ApiError> {
    if payload.file_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "file_name must not be empty".to_string(),
        ));
    }

    Task::find_by_id(&state.db.pool, user_id, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;

    let attachment =
        Attachment::create(&state.db.pool, user_id, task_id, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(attachment)))
}

pub async fn delete_attachment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((_task_id, attachment_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Attachment::delete(&state.db.pool, user_id, attachment_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("attachment"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/tasks/{task_id}/attachments",
            get(list_attachments).post(create_attachment),
        )
        .route(
            "/tasks/{task_id}/attachments/{attachment_id}",
            axum::routing::delete(delete_attachment),
        )
}
