//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into JSON responses with status codes. Internal
//! details are logged server-side and never leak to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use services::services::{insight::InsightError, streak::StreakError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} is not configured")]
    ServiceUnavailable(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Streak(#[from] StreakError),
    #[error(transparent)]
    Insight(#[from] InsightError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Self::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "not found".to_string())
            }
            Self::Database(e) => internal(e.into()),
            Self::Streak(StreakError::Database(e)) => internal(e.into()),
            Self::Insight(InsightError::Database(e)) => internal(e.into()),
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

fn internal(err: anyhow::Error) -> (StatusCode, String) {
    tracing::error!(error = ?err, "internal server error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}
