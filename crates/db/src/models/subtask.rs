use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Subtask {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSubtask {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateSubtask {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

const SUBTASK_COLUMNS: &str = "id, task_id, user_id, title, completed, created_at, updated_at";

impl Subtask {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        task_id: Uuid,
        data: &CreateSubtask,
        subtask_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO subtasks (id, task_id, user_id, title) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SUBTASK_COLUMNS}"
        );
        sqlx::query_as::<_, Subtask>(&sql)
            .bind(subtask_id)
            .bind(task_id)
            .bind(user_id)
            .bind(&data.title)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_task_id(
        pool: &SqlitePool,
        user_id: Uuid,
        task_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {SUBTASK_COLUMNS} FROM subtasks \
             WHERE task_id = $1 AND user_id = $2 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Subtask>(&sql)
            .bind(task_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
        data: &UpdateSubtask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE subtasks \
             SET title = COALESCE($3, title), \
                 completed = COALESCE($4, completed), \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {SUBTASK_COLUMNS}"
        );
        sqlx::query_as::<_, Subtask>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&data.title)
            .bind(data.completed)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
