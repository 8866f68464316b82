//! Routes for AI insight text and voice-command parsing.

use axum::{Router, extract::State, response::Json as ResponseJson, routing::post};
use serde::{Deserialize, Serialize};
use services::services::{
    insight::InsightService,
    voice_command::{VoiceCommandService, VoiceIntent},
};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, auth::AuthUser, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct InsightResponse {
    pub insight: String,
}

pub async fn generate_insight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<ResponseJson<ApiResponse<InsightResponse>>, ApiError> {
    let client = state
        .generative
        .clone()
        .ok_or(ApiError::ServiceUnavailable("generative API"))?;

    let service = InsightService::new(state.db.pool.clone(), client);
    let insight = service.generate_insight(user_id).await?;

    Ok(ResponseJson(ApiResponse::success(InsightResponse {
        insight,
    })))
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct ParseVoiceCommand {
    pub transcript: String,
}

pub async fn parse_voice_command(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    axum::Json(payload): axum::Json<ParseVoiceCommand>,
) -> Result<ResponseJson<ApiResponse<VoiceIntent>>, ApiError> {
    if payload.transcript.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "transcript must not be empty".to_string(),
        ));
    }

    let client = state
        .generative
        .clone()
        .ok_or(ApiError::ServiceUnavailable("generative API"))?;

    let intent = VoiceCommandService::new(client)
        .parse_transcript(&payload.transcript)
        .await;

    tracing::debug!(user_id = %user_id, action = %intent.action, "parsed voice command");

    Ok(ResponseJson(ApiResponse::success(intent)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/insights", post(generate_insight))
        .route("/voice/parse", post(parse_voice_command))
}
