//! Consecutive-day completion streak tracking.

use chrono::NaiveDate;
use db::models::streak::StreakRecord;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StreakError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Streak values to persist after a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_completed_date: NaiveDate,
    pub total_tasks_completed: i64,
}

/// Compute the streak values that follow a completion on `today`.
///
/// A repeat completion on the already-counted day only bumps the lifetime
/// total. A completion on any other date extends the streak by one day;
/// skipped days do not reset the count. `today` must not precede the
/// recorded date — the caller owns that ordering.
pub fn advance(existing: Option<&StreakRecord>, today: NaiveDate) -> StreakUpdate {
    match existing {
        None => StreakUpdate {
            current_streak: 1,
            longest_streak: 1,
            last_completed_date: today,
            total_tasks_completed: 1,
        },
        Some(record) if record.last_completed_date == Some(today) => StreakUpdate {
            current_streak: record.current_streak,
            longest_streak: record.longest_streak,
            last_completed_date: today,
            total_tasks_completed: record.total_tasks_completed + 1,
        },
        Some(record) => {
            let current = record.current_streak + 1;
            StreakUpdate {
                current_streak: current,
                longest_streak: record.longest_streak.max(current),
                last_completed_date: today,
                total_tasks_completed: record.total_tasks_completed + 1,
            }
        }
    }
}

pub struct StreakService;

impl StreakService {
    /// Apply a completion on `today` to the user's streak row.
    ///
    /// The read-compute-write cycle runs in one transaction so concurrent
    /// completions by the same user cannot lose an update.
    pub async fn record_completion(
        pool: &SqlitePool,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<StreakRecord, StreakError> {
        let mut tx = pool.begin().await?;

        let existing = StreakRecord::find_by_user_id(&mut *tx, user_id).await?;
        let next = advance(existing.as_ref(), today);
        let record = StreakRecord::upsert(
            &mut *tx,
            user_id,
            next.current_streak,
            next.longest_streak,
            next.last_completed_date,
            next.total_tasks_completed,
        )
        .await?;

        tx.commit().await?;

        info!(
            user_id = %user_id,
            current_streak = record.current_streak,
            longest_streak = record.longest_streak,
            "recorded task completion"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(
        current: i64,
        longest: i64,
        last: Option<NaiveDate>,
        total: i64,
    ) -> StreakRecord {
        StreakRecord {
            user_id: Uuid::new_v4(),
            current_streak: current,
            longest_streak: longest,
            last_completed_date: last,
            total_tasks_completed: total,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assert_invariant(update: &StreakUpdate) {
        assert!(update.longest_streak >= update.current_streak);
    }

    #[test]
    fn first_completion_creates_fresh_streak() {
        let update = advance(None, date(2024, 1, 1));
        assert_eq!(update.current_streak, 1);
        assert_eq!(update.longest_streak, 1);
        assert_eq!(update.total_tasks_completed, 1);
        assert_eq!(update.last_completed_date, date(2024, 1, 1));
        assert_invariant(&update);
    }

    #[test]
    fn same_day_repeat_only_bumps_total() {
        let today = date(2024, 3, 15);
        let existing = record(4, 9, Some(today), 30);

        let update = advance(Some(&existing), today);
        assert_eq!(update.current_streak, 4);
        assert_eq!(update.longest_streak, 9);
        assert_eq!(update.total_tasks_completed, 31);
        assert_eq!(update.last_completed_date, today);
        assert_invariant(&update);
    }

    #[test]
    fn same_day_repeats_are_idempotent_for_streak_values() {
        let today = date(2024, 3, 15);
        let mut existing = record(4, 9, Some(today), 30);

        for expected_total in 31..=33 {
            let update = advance(Some(&existing), today);
            assert_eq!(update.current_streak, 4);
            assert_eq!(update.longest_streak, 9);
            assert_eq!(update.total_tasks_completed, expected_total);
            existing.total_tasks_completed = update.total_tasks_completed;
        }
    }

    #[test]
    fn new_day_extends_the_streak() {
        let existing = record(2, 2, Some(date(2024, 1, 2)), 5);

        let update = advance(Some(&existing), date(2024, 1, 3));
        assert_eq!(update.current_streak, 3);
        assert_eq!(update.longest_streak, 3);
        assert_eq!(update.total_tasks_completed, 6);
        assert_eq!(update.last_completed_date, date(2024, 1, 3));
        assert_invariant(&update);
    }

    #[test]
    fn longest_streak_keeps_its_high_water_mark() {
        let existing = record(2, 7, Some(date(2024, 5, 1)), 40);

        let update = advance(Some(&existing), date(2024, 5, 2));
        assert_eq!(update.current_streak, 3);
        assert_eq!(update.longest_streak, 7);
        assert_invariant(&update);
    }

    #[test]
    fn missing_last_date_counts_as_a_new_day() {
        let existing = record(0, 0, None, 0);

        let update = advance(Some(&existing), date(2024, 6, 1));
        assert_eq!(update.current_streak, 1);
        assert_eq!(update.longest_streak, 1);
        assert_eq!(update.total_tasks_completed, 1);
        assert_invariant(&update);
    }

    // Skipped days hold the streak rather than resetting it; the 8-day gap
    // below still extends the count by one.
    #[test]
    fn multi_day_gap_does_not_reset() {
        let update = advance(None, date(2024, 1, 1));
        assert_eq!(
            (update.current_streak, update.longest_streak, update.total_tasks_completed),
            (1, 1, 1)
        );

        let existing = record(1, 1, Some(date(2024, 1, 1)), 1);
        let update = advance(Some(&existing), date(2024, 1, 1));
        assert_eq!(
            (update.current_streak, update.longest_streak, update.total_tasks_completed),
            (1, 1, 2)
        );

        let existing = record(1, 1, Some(date(2024, 1, 1)), 2);
        let update = advance(Some(&existing), date(2024, 1, 2));
        assert_eq!(
            (update.current_streak, update.longest_streak, update.total_tasks_completed),
            (2, 2, 3)
        );

        let existing = record(2, 2, Some(date(2024, 1, 2)), 3);
        let update = advance(Some(&existing), date(2024, 1, 10));
        assert_eq!(
            (update.current_streak, update.longest_streak, update.total_tasks_completed),
            (3, 3, 4)
        );
        assert_eq!(update.last_completed_date, date(2024, 1, 10));
    }
}
