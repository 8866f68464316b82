use chrono::{NaiveDate, Utc};
use db::models::{
    attachment::{Attachment, CreateAttachment},
    streak::StreakRecord,
    subtask::{CreateSubtask, Subtask, UpdateSubtask},
    task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask},
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use uuid::Uuid;

async fn test_pool() -> SqlitePool {
    // Single connection so the in-memory database is shared across queries.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

fn sample_task(title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        priority: None,
        category: None,
        due_date: None,
        reminder_at: None,
        time_estimate_minutes: None,
    }
}

#[tokio::test]
async fn create_and_fetch_task_is_scoped_to_owner() {
    let pool = test_pool().await;
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let task = Task::create(&pool, owner, &sample_task("write report"), Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, TaskPriority::Medium);

    let found = Task::find_by_id(&pool, owner, task.id).await.unwrap();
    assert!(found.is_some());

    // Cross-user reads fail closed.
    let denied = Task::find_by_id(&pool, stranger, task.id).await.unwrap();
    assert!(denied.is_none());
}

#[tokio::test]
async fn list_applies_status_category_and_priority_filters() {
    let pool = test_pool().await;
    let user = Uuid::new_v4();

    let mut work = sample_task("send invoice");
    work.category = Some("work".to_string());
    work.priority = Some(TaskPriority::Urgent);
    Task::create(&pool, user, &work, Uuid::new_v4()).await.unwrap();

    let mut home = sample_task("water plants");
    home.category = Some("home".to_string());
    Task::create(&pool, user, &home, Uuid::new_v4()).await.unwrap();

    let all = Task::list(&pool, user, &TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let filter = TaskFilter {
        category: Some("work".to_string()),
        ..Default::default()
    };
    let work_only = Task::list(&pool, user, &filter).await.unwrap();
    assert_eq!(work_only.len(), 1);
    assert_eq!(work_only[0].title, "send invoice");

    let filter = TaskFilter {
        priority: Some(TaskPriority::Urgent),
        ..Default::default()
    };
    let urgent = Task::list(&pool, user, &filter).await.unwrap();
    assert_eq!(urgent.len(), 1);

    let filter = TaskFilter {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    let completed = Task::list(&pool, user, &filter).await.unwrap();
    assert!(completed.is_empty());
}

#[tokio::test]
async fn cross_user_writes_affect_no_rows() {
    let pool = test_pool().await;
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let task = Task::create(&pool, owner, &sample_task("pay rent"), Uuid::new_v4())
        .await
        .unwrap();

    let update = UpdateTask {
        title: Some("hijacked".to_string()),
        description: None,
        status: None,
        priority: None,
        category: None,
        due_date: None,
        reminder_at: None,
        time_estimate_minutes: None,
        time_spent_minutes: None,
    };
    let denied = Task::update(&pool, stranger, task.id, &update).await.unwrap();
    assert!(denied.is_none());

    let deleted = Task::delete(&pool, stranger, task.id).await.unwrap();
    assert_eq!(deleted, 0);

    let still_there = Task::find_by_id(&pool, owner, task.id).await.unwrap().unwrap();
    assert_eq!(still_there.title, "pay rent");
}

#[tokio::test]
async fn mark_completed_sets_status_and_timestamp() {
    let pool = test_pool().await;
    let user = Uuid::new_v4();

    let task = Task::create(&pool, user, &sample_task("review PR"), Uuid::new_v4())
        .await
        .unwrap();

    let now = Utc::now();
    let done = Task::mark_completed(&pool, user, task.id, now)
        .await
        .unwrap()
        .expect("task exists");
    assert_eq!(done.status, TaskStatus::Completed);
    assert!(done.completed_at.is_some());
}

#[tokio::test]
async fn subtasks_follow_their_task_and_owner() {
    let pool = test_pool().await;
    let user = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let task = Task::create(&pool, user, &sample_task("plan trip"), Uuid::new_v4())
        .await
        .unwrap();

    let create = CreateSubtask {
        title: "book flights".to_string(),
    };
    let subtask = Subtask::create(&pool, user, task.id, &create, Uuid::new_v4())
        .await
        .unwrap();
    assert!(!subtask.completed);

    let listed = Subtask::find_by_task_id(&pool, user, task.id).await.unwrap();
    assert_eq!(listed.len(), 1);

    let denied = Subtask::find_by_task_id(&pool, stranger, task.id).await.unwrap();
    assert!(denied.is_empty());

    let update = UpdateSubtask {
        title: None,
        completed: Some(true),
    };
    let updated = Subtask::update(&pool, user, subtask.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.completed);

    assert_eq!(Subtask::delete(&pool, user, subtask.id).await.unwrap(), 1);
}

#[tokio::test]
async fn attachment_metadata_round_trip() {
    let pool = test_pool().await;
    let user = Uuid::new_v4();

    let task = Task::create(&pool, user, &sample_task("scan receipts"), Uuid::new_v4())
        .await
        .unwrap();

    let create = CreateAttachment {
        file_name: "receipt.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        storage_path: "attachments/receipt.jpg".to_string(),
        size_bytes: Some(48_213),
    };
    let attachment = Attachment::create(&pool, user, task.id, &create, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(attachment.file_name, "receipt.jpg");

    let listed = Attachment::find_by_task_id(&pool, user, task.id).await.unwrap();
    assert_eq!(listed.len(), 1);

    assert_eq!(
        Attachment::delete(&pool, user, attachment.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn streak_upsert_creates_then_overwrites() {
    let pool = test_pool().await;
    let user = Uuid::new_v4();

    assert!(StreakRecord::find_by_user_id(&pool, user).await.unwrap().is_none());

    let day1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let created = StreakRecord::upsert(&pool, user, 1, 1, day1, 1).await.unwrap();
    assert_eq!(created.current_streak, 1);
    assert_eq!(created.last_completed_date, Some(day1));

    let day2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let updated = StreakRecord::upsert(&pool, user, 2, 2, day2, 3).await.unwrap();
    assert_eq!(updated.current_streak, 2);
    assert_eq!(updated.total_tasks_completed, 3);
    assert_eq!(updated.last_completed_date, Some(day2));

    let fetched = StreakRecord::find_by_user_id(&pool, user)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.current_streak, 2);
}

#[tokio::test]
async fn stats_aggregate_counts_by_status() {
    let pool = test_pool().await;
    let user = Uuid::new_v4();

    let empty = Task::stats(&pool, user).await.unwrap();
    assert_eq!(empty.total, 0);
    assert_eq!(empty.minutes_spent, 0);

    let task = Task::create(&pool, user, &sample_task("a"), Uuid::new_v4())
        .await
        .unwrap();
    Task::create(&pool, user, &sample_task("b"), Uuid::new_v4())
        .await
        .unwrap();

    let update = UpdateTask {
        title: None,
        description: None,
        status: None,
        priority: None,
        category: None,
        due_date: None,
        reminder_at: None,
        time_estimate_minutes: None,
        time_spent_minutes: Some(25),
    };
    Task::update(&pool, user, task.id, &update).await.unwrap();
    Task::mark_completed(&pool, user, task.id, Utc::now()).await.unwrap();

    let stats = Task::stats(&pool, user).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.minutes_spent, 25);
}
