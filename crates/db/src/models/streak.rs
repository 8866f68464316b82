use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use ts_rs::TS;
use uuid::Uuid;

/// One row per user tracking consecutive-day completion streaks.
///
/// `current_streak` counts distinct days with at least one completion ending
/// at `last_completed_date`; `longest_streak` is the high-water mark of
/// `current_streak`; `total_tasks_completed` is the lifetime completion count.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct StreakRecord {
    pub user_id: Uuid,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_completed_date: Option<NaiveDate>,
    pub total_tasks_completed: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const STREAK_COLUMNS: &str = "user_id, current_streak, longest_streak, last_completed_date, \
     total_tasks_completed, created_at, updated_at";

impl StreakRecord {
    pub async fn find_by_user_id<'e, E>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {STREAK_COLUMNS} FROM streaks WHERE user_id = $1");
        sqlx::query_as::<_, StreakRecord>(&sql)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn upsert<'e, E>(
        executor: E,
        user_id: Uuid,
        current_streak: i64,
        longest_streak: i64,
        last_completed_date: NaiveDate,
        total_tasks_completed: i64,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "INSERT INTO streaks (user_id, current_streak, longest_streak, last_completed_date, \
             total_tasks_completed) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT(user_id) DO UPDATE SET \
                 current_streak = excluded.current_streak, \
                 longest_streak = excluded.longest_streak, \
                 last_completed_date = excluded.last_completed_date, \
                 total_tasks_completed = excluded.total_tasks_completed, \
                 updated_at = CURRENT_TIMESTAMP \
             RETURNING {STREAK_COLUMNS}"
        );
        sqlx::query_as::<_, StreakRecord>(&sql)
            .bind(user_id)
            .bind(current_streak)
            .bind(longest_streak)
            .bind(last_completed_date)
            .bind(total_tasks_completed)
            .fetch_one(executor)
            .await
    }
}
