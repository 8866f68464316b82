//! Background scan that fires task reminders once their time has passed.

use std::time::Duration;

use db::{DBService, models::task::Task};
use thiserror::Error;
use tokio::time::interval;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Background service that marks due reminders as sent.
///
/// Delivery to the device happens in the mobile client layer; the scan only
/// emits the event and flips `reminder_sent` so a reminder fires once.
pub struct ReminderService {
    db: DBService,
    poll_interval: Duration,
}

impl ReminderService {
    /// Spawn the reminder scan loop.
    pub async fn spawn(db: DBService) -> tokio::task::JoinHandle<()> {
        let service = Self {
            db,
            poll_interval: Duration::from_secs(60),
        };
        tokio::spawn(async move {
            service.start().await;
        })
    }

    async fn start(&self) {
        info!(
            "Starting reminder service with interval {:?}",
            self.poll_interval
        );

        let mut interval = interval(self.poll_interval);

        loop {
            interval.tick().await;
            if let Err(e) = self.fire_due_reminders().await {
                error!("Error scanning for due reminders: {}", e);
            }
        }
    }

    async fn fire_due_reminders(&self) -> Result<(), ReminderError> {
        let due = Task::find_due_reminders(&self.db.pool).await?;

        if due.is_empty() {
            debug!("reminder scan: nothing due");
            return Ok(());
        }

        for task in due {
            info!(
                task_id = %task.id,
                user_id = %task.user_id,
                title = %task.title,
                reminder_at = ?task.reminder_at,
                "task reminder due"
            );

            Task::mark_reminder_sent(&self.db.pool, task.id).await?;
        }

        Ok(())
    }
}
