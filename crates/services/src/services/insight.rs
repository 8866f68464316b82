//! AI insight text summarizing a user's recent task activity.

use db::models::{
    streak::StreakRecord,
    task::{Task, TaskStats},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::generative_api::GenerativeApiClient;

/// Shown whenever the generative call fails or returns nothing usable.
pub const FALLBACK_INSIGHT: &str =
    "Keep showing up! Complete a task today to keep your streak growing.";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct InsightService {
    pool: SqlitePool,
    client: GenerativeApiClient,
}

impl InsightService {
    pub fn new(pool: SqlitePool, client: GenerativeApiClient) -> Self {
        Self { pool, client }
    }

    /// Produce a short motivational insight for the user.
    ///
    /// Generative failures never surface to the caller; the fixed fallback
    /// string is returned instead.
    pub async fn generate_insight(&self, user_id: Uuid) -> Result<String, InsightError> {
        let stats = Task::stats(&self.pool, user_id).await?;
        let streak = StreakRecord::find_by_user_id(&self.pool, user_id).await?;

        let prompt = build_prompt(&stats, streak.as_ref());
        match self.client.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => {
                warn!(user_id = %user_id, "empty insight response, using fallback");
                Ok(FALLBACK_INSIGHT.to_string())
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "insight generation failed, using fallback");
                Ok(FALLBACK_INSIGHT.to_string())
            }
        }
    }
}

fn build_prompt(stats: &TaskStats, streak: Option<&StreakRecord>) -> String {
    let (current_streak, longest_streak) = streak
        .map(|s| (s.current_streak, s.longest_streak))
        .unwrap_or((0, 0));

    format!(
        "You are a productivity coach inside a task-management app. \
         Write a short, encouraging insight (2-3 sentences, no markdown) for a user with \
         these numbers:\n\
         - Total tasks: {}\n\
         - Pending: {}\n\
         - In progress: {}\n\
         - Completed: {}\n\
         - Minutes spent on completed tasks: {}\n\
         - Current daily streak: {} days\n\
         - Longest daily streak: {} days\n\
         Mention the streak if it is greater than zero. Be specific, not generic.",
        stats.total,
        stats.pending,
        stats.in_progress,
        stats.completed,
        stats.minutes_spent,
        current_streak,
        longest_streak,
    )
}
