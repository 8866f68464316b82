//! Route for the user's completion streak.

use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use chrono::NaiveDate;
use db::models::streak::StreakRecord;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, auth::AuthUser, error::ApiError};

/// Streak as shown to the client. A user with no completions yet gets the
/// zero record instead of a 404.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct StreakResponse {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_completed_date: Option<NaiveDate>,
    pub total_tasks_completed: i64,
}

impl From<StreakRecord> for StreakResponse {
    fn from(record: StreakRecord) -> Self {
        Self {
            current_streak: record.current_streak,
            longest_streak: record.longest_streak,
            last_completed_date: record.last_completed_date,
            total_tasks_completed: record.total_tasks_completed,
        }
    }
}

impl StreakResponse {
    fn empty() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
            total_tasks_completed: 0,
        }
    }
}

pub async fn get_streak(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<ResponseJson<ApiResponse<StreakResponse>>, ApiError> {
    let streak = StreakRecord::find_by_user_id(&state.db.pool, user_id)
        .await?
        .map(StreakResponse::from)
        .unwrap_or_else(StreakResponse::empty);
    Ok(ResponseJson(ApiResponse::success(streak)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/streak", get(get_streak))
}
