//! Per-day accumulation of study session counters.
//!
//! A day's record is created by the first session update that lands on it
//! and grows with every later update. `accuracy_rate` is always recomputed
//! from the stored totals, never accumulated itself.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::operations::daily_stats;
use crate::db::operations::{DailyStat, StudySession};

pub const DEFAULT_HISTORY_DAYS: i64 = 30;
const MAX_HISTORY_DAYS: i64 = 36_500;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("daily totals for {0} would overflow")]
    Overflow(NaiveDate),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Amounts folded into a day's totals by one session update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatDelta {
    pub correct_count: i64,
    pub wrong_count: i64,
    pub words_studied: i64,
    pub study_time_seconds: i64,
}

impl StatDelta {
    /// The session's current counters; an open session contributes no time.
    pub fn from_session(session: &StudySession) -> Self {
        Self {
            correct_count: session.correct_count,
            wrong_count: session.wrong_count,
            words_studied: session.words_studied,
            study_time_seconds: session.duration_seconds.unwrap_or(0),
        }
    }
}

/// Percentage of correct answers; 0.0 when nothing was attempted.
pub fn accuracy_rate(correct_count: i64, wrong_count: i64) -> f64 {
    let attempts = correct_count.saturating_add(wrong_count);
    if attempts <= 0 {
        return 0.0;
    }
    correct_count as f64 / attempts as f64 * 100.0
}

impl DailyStat {
    /// First record for `date`: the totals are exactly the delta.
    pub fn from_delta(date: NaiveDate, delta: StatDelta) -> Self {
        Self {
            id: None,
            date,
            study_time_seconds: delta.study_time_seconds,
            words_studied: delta.words_studied,
            correct_count: delta.correct_count,
            wrong_count: delta.wrong_count,
            accuracy_rate: accuracy_rate(delta.correct_count, delta.wrong_count),
        }
    }

    /// Adds `delta` to the totals. On overflow the record is left unchanged.
    pub fn accumulate(&mut self, delta: StatDelta) -> Result<(), StatsError> {
        let overflow = || StatsError::Overflow(self.date);
        let study_time_seconds = self
            .study_time_seconds
            .checked_add(delta.study_time_seconds)
            .ok_or_else(overflow)?;
        let words_studied = self
            .words_studied
            .checked_add(delta.words_studied)
            .ok_or_else(overflow)?;
        let correct_count = self
            .correct_count
            .checked_add(delta.correct_count)
            .ok_or_else(overflow)?;
        let wrong_count = self
            .wrong_count
            .checked_add(delta.wrong_count)
            .ok_or_else(overflow)?;
        correct_count.checked_add(wrong_count).ok_or_else(overflow)?;

        self.study_time_seconds = study_time_seconds;
        self.words_studied = words_studied;
        self.correct_count = correct_count;
        self.wrong_count = wrong_count;
        self.accuracy_rate = accuracy_rate(correct_count, wrong_count);
        Ok(())
    }

    pub fn attempts(&self) -> i64 {
        self.correct_count.saturating_add(self.wrong_count)
    }
}

/// Adds `delta` to the record for `date`, creating it on first write.
/// Runs on the caller's connection so it commits with the session update.
pub async fn fold_into_day(
    conn: &mut SqliteConnection,
    date: NaiveDate,
    delta: StatDelta,
) -> Result<DailyStat, StatsError> {
    let stat = match daily_stats::find_by_date(&mut *conn, date).await? {
        Some(mut existing) => {
            existing.accumulate(delta)?;
            existing
        }
        None => {
            tracing::debug!(%date, "creating daily stat");
            DailyStat::from_delta(date, delta)
        }
    };

    let saved = daily_stats::upsert(conn, &stat).await?;

    tracing::info!(
        %date,
        correct = saved.correct_count,
        wrong = saved.wrong_count,
        accuracy = saved.accuracy_rate,
        "daily stats updated"
    );

    Ok(saved)
}

/// Records from `days` days before `today` up to today, oldest first.
pub async fn history(
    pool: &SqlitePool,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<DailyStat>, sqlx::Error> {
    let from = today - chrono::Duration::days(days.clamp(0, MAX_HISTORY_DAYS));
    daily_stats::list_since(pool, from).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn delta(correct: i64, wrong: i64) -> StatDelta {
        StatDelta {
            correct_count: correct,
            wrong_count: wrong,
            ..StatDelta::default()
        }
    }

    #[test]
    fn test_accuracy_without_attempts_is_zero() {
        assert_eq!(accuracy_rate(0, 0), 0.0);
    }

    #[test]
    fn test_accuracy_is_percentage() {
        assert_eq!(accuracy_rate(3, 1), 75.0);
        assert_eq!(accuracy_rate(5, 3), 62.5);
        assert_eq!(accuracy_rate(0, 4), 0.0);
        assert_eq!(accuracy_rate(7, 0), 100.0);
    }

    #[test]
    fn test_first_record_equals_delta() {
        let d = StatDelta {
            correct_count: 3,
            wrong_count: 1,
            words_studied: 4,
            study_time_seconds: 120,
        };
        let stat = DailyStat::from_delta(day(), d);
        assert_eq!(stat.id, None);
        assert_eq!(stat.correct_count, 3);
        assert_eq!(stat.wrong_count, 1);
        assert_eq!(stat.words_studied, 4);
        assert_eq!(stat.study_time_seconds, 120);
        assert_eq!(stat.accuracy_rate, 75.0);
    }

    #[test]
    fn test_accumulate_recomputes_accuracy() {
        let mut stat = DailyStat::from_delta(day(), delta(3, 1));
        stat.accumulate(delta(2, 2)).unwrap();
        assert_eq!(stat.correct_count, 5);
        assert_eq!(stat.wrong_count, 3);
        assert_eq!(stat.attempts(), 8);
        assert_eq!(stat.accuracy_rate, 62.5);
    }

    #[test]
    fn test_accuracy_at_counter_limits() {
        assert_eq!(accuracy_rate(i64::MAX, 0), 100.0);
        assert!(accuracy_rate(i64::MAX, 1) <= 100.0);
    }

    #[test]
    fn test_accumulate_overflow_leaves_totals_unchanged() {
        let mut stat = DailyStat::from_delta(day(), delta(i64::MAX - 1, 0));
        let before = stat.clone();
        let err = stat.accumulate(delta(5, 0)).unwrap_err();
        assert!(matches!(err, StatsError::Overflow(d) if d == day()));
        assert_eq!(stat, before);

        let mut stat = DailyStat::from_delta(day(), delta(i64::MAX / 2, 0));
        assert!(stat.accumulate(delta(0, i64::MAX / 2 + 2)).is_err());
        assert_eq!(stat.wrong_count, 0);
    }

    #[test]
    fn test_open_session_contributes_no_time() {
        let session = StudySession {
            id: 1,
            start_time: chrono::Utc::now(),
            end_time: None,
            correct_count: 2,
            wrong_count: 0,
            words_studied: 2,
            duration_seconds: None,
        };
        let d = StatDelta::from_session(&session);
        assert_eq!(d.study_time_seconds, 0);
        assert_eq!(d.words_studied, 2);
    }
}
