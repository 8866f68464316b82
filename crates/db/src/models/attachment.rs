use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Attachment metadata. The bytes themselves live in external object storage;
/// this table only records the reference.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Attachment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub storage_path: String,
    pub size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub storage_path: String,
    pub size_bytes: Option<i64>,
}

const ATTACHMENT_COLUMNS: &str =
    "id, task_id, user_id, file_name, mime_type, storage_path, size_bytes, created_at";

impl Attachment {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        task_id: Uuid,
        data: &CreateAttachment,
        attachment_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO attachments (id, task_id, user_id, file_name, mime_type, storage_path, \
             size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ATTACHMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&sql)
            .bind(attachment_id)
            .bind(task_id)
            .bind(user_id)
            .bind(&data.file_name)
            .bind(&data.mime_type)
            .bind(&data.storage_path)
            .bind(data.size_bytes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_task_id(
        pool: &SqlitePool,
        user_id: Uuid,
        task_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments \
             WHERE task_id = $1 AND user_id = $2 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Attachment>(&sql)
            .bind(task_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
