use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, QueryBuilder, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Task priority. Stored as its integer level (1 = lowest urgency, 4 = highest).
#[derive(
    Debug,
    Clone,
    Copy,
    Type,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    TS,
    EnumString,
    Display,
    Default,
)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskPriority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl TaskPriority {
    /// Map an integer level (1-4) to a priority. Out-of-range levels are rejected.
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn level(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub reminder_sent: bool,
    pub time_estimate_minutes: Option<i64>,
    pub time_spent_minutes: Option<i64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub time_estimate_minutes: Option<i64>,
}

/// Partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub time_estimate_minutes: Option<i64>,
    pub time_spent_minutes: Option<i64>,
}

/// Optional filters for listing a user's tasks.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
    pub priority: Option<TaskPriority>,
}

/// Per-user aggregate used for the insight prompt and the stats endpoint.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct TaskStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub minutes_spent: i64,
}

const TASK_COLUMNS: &str = "id, user_id, title, description, status, priority, category, \
     due_date, reminder_at, reminder_sent, time_estimate_minutes, time_spent_minutes, \
     completed_at, created_at, updated_at";

impl Task {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreateTask,
        task_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let priority = data.priority.unwrap_or_default();
        let sql = format!(
            "INSERT INTO tasks (id, user_id, title, description, priority, category, due_date, \
             reminder_at, time_estimate_minutes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(user_id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(priority)
            .bind(&data.category)
            .bind(data.due_date)
            .bind(data.reminder_at)
            .bind(data.time_estimate_minutes)
            .fetch_one(pool)
            .await
    }

    /// Scoped to the owning user: another user's task id yields `None`.
    pub async fn find_by_id(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &SqlitePool,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = "
        ));
        qb.push_bind(user_id);
        if let Some(status) = &filter.status {
            qb.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(priority) = filter.priority {
            qb.push(" AND priority = ").push_bind(priority);
        }
        qb.push(" ORDER BY created_at DESC");

        qb.build_query_as::<Task>().fetch_all(pool).await
    }

    pub async fn update(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE tasks \
             SET title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 status = COALESCE($5, status), \
                 priority = COALESCE($6, priority), \
                 category = COALESCE($7, category), \
                 due_date = COALESCE($8, due_date), \
                 reminder_at = COALESCE($9, reminder_at), \
                 time_estimate_minutes = COALESCE($10, time_estimate_minutes), \
                 time_spent_minutes = COALESCE($11, time_spent_minutes), \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(&data.status)
            .bind(data.priority)
            .bind(&data.category)
            .bind(data.due_date)
            .bind(data.reminder_at)
            .bind(data.time_estimate_minutes)
            .bind(data.time_spent_minutes)
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_completed(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE tasks \
             SET status = 'completed', completed_at = $3, updated_at = CURRENT_TIMESTAMP \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete<'e, E>(executor: E, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Tasks whose reminder time has passed and which have not been notified yet.
    /// Spans all users; used by the background reminder scan.
    pub async fn find_due_reminders(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE reminder_at IS NOT NULL \
               AND reminder_sent = 0 \
               AND status != 'completed' \
               AND datetime(reminder_at) <= datetime('now') \
             ORDER BY reminder_at ASC"
        );
        sqlx::query_as::<_, Task>(&sql).fetch_all(pool).await
    }

    pub async fn mark_reminder_sent(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tasks SET reminder_sent = 1, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn stats(pool: &SqlitePool, user_id: Uuid) -> Result<TaskStats, sqlx::Error> {
        sqlx::query_as::<_, TaskStats>(
            r#"SELECT
                 COUNT(*) AS total,
                 COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) AS pending,
                 COALESCE(SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END), 0) AS in_progress,
                 COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) AS completed,
                 COALESCE(SUM(CASE WHEN status = 'completed' THEN COALESCE(time_spent_minutes, 0) ELSE 0 END), 0) AS minutes_spent
               FROM tasks
               WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
