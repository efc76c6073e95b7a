use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::clock::Clock;
use crate::db::operations::sessions;
use crate::db::operations::{DailyStat, StudySession};
use crate::services::daily_stats::{self, StatDelta, StatsError};

/// Largest value a single patch may set on any counter.
pub const MAX_COUNTER_VALUE: i64 = 1_000_000_000;

/// Partial session update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionPatch {
    pub end_time: Option<DateTime<Utc>>,
    pub correct_count: Option<i64>,
    pub wrong_count: Option<i64>,
    pub words_studied: Option<i64>,
    pub duration_seconds: Option<i64>,
}

impl SessionPatch {
    pub fn touches_counters(&self) -> bool {
        self.correct_count.is_some()
            || self.wrong_count.is_some()
            || self.words_studied.is_some()
            || self.duration_seconds.is_some()
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let counters = [
            self.correct_count,
            self.wrong_count,
            self.words_studied,
            self.duration_seconds,
        ];
        if counters.iter().flatten().any(|value| *value < 0) {
            return Err("counters must not be negative");
        }
        if counters.iter().flatten().any(|value| *value > MAX_COUNTER_VALUE) {
            return Err("counters must not exceed 1000000000");
        }
        Ok(())
    }
}

impl StudySession {
    pub fn apply(&mut self, patch: &SessionPatch) {
        if let Some(end_time) = patch.end_time {
            self.end_time = Some(end_time);
        }
        if let Some(correct) = patch.correct_count {
            self.correct_count = correct;
        }
        if let Some(wrong) = patch.wrong_count {
            self.wrong_count = wrong;
        }
        if let Some(words) = patch.words_studied {
            self.words_studied = words;
        }
        if let Some(duration) = patch.duration_seconds {
            self.duration_seconds = Some(duration);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub session: StudySession,
    /// Present when the patch carried counters and the day was re-aggregated.
    pub daily_stat: Option<DailyStat>,
}

pub async fn start_session(
    pool: &SqlitePool,
    clock: &dyn Clock,
    start_time: Option<DateTime<Utc>>,
) -> Result<StudySession, sqlx::Error> {
    let start_time = start_time.unwrap_or_else(|| clock.now());
    let session = sessions::insert_session(pool, start_time).await?;
    tracing::info!(session_id = session.id, %start_time, "study session started");
    Ok(session)
}

/// Applies `patch` to the session and, when it sets any counter, folds the
/// session's counters into today's daily stat. Both writes share one
/// transaction. Returns `None` for an unknown session.
pub async fn update_session(
    pool: &SqlitePool,
    clock: &dyn Clock,
    session_id: i64,
    patch: &SessionPatch,
) -> Result<Option<SessionUpdate>, StatsError> {
    let mut tx = pool.begin().await?;

    let Some(mut session) = sessions::find_session(&mut *tx, session_id).await? else {
        return Ok(None);
    };

    session.apply(patch);
    sessions::save_session(&mut *tx, &session).await?;

    // Aggregated under the date of the update, not of the session start.
    let daily_stat = if patch.touches_counters() {
        let delta = StatDelta::from_session(&session);
        Some(daily_stats::fold_into_day(&mut *tx, clock.today(), delta).await?)
    } else {
        None
    };

    tx.commit().await?;

    tracing::info!(
        session_id,
        closed = session.is_closed(),
        correct = session.correct_count,
        wrong = session.wrong_count,
        "study session updated"
    );

    Ok(Some(SessionUpdate {
        session,
        daily_stat,
    }))
}

pub async fn latest_session(pool: &SqlitePool) -> Result<Option<StudySession>, sqlx::Error> {
    sessions::latest_session(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_session() -> StudySession {
        StudySession {
            id: 7,
            start_time: Utc::now(),
            end_time: None,
            correct_count: 0,
            wrong_count: 0,
            words_studied: 0,
            duration_seconds: None,
        }
    }

    #[test]
    fn test_apply_only_present_fields() {
        let mut session = open_session();
        session.apply(&SessionPatch {
            correct_count: Some(4),
            ..SessionPatch::default()
        });
        assert_eq!(session.correct_count, 4);
        assert_eq!(session.wrong_count, 0);
        assert_eq!(session.duration_seconds, None);
        assert!(!session.is_closed());

        let end = Utc::now();
        session.apply(&SessionPatch {
            end_time: Some(end),
            duration_seconds: Some(300),
            ..SessionPatch::default()
        });
        assert_eq!(session.correct_count, 4);
        assert_eq!(session.duration_seconds, Some(300));
        assert_eq!(session.end_time, Some(end));
    }

    #[test]
    fn test_end_time_alone_does_not_touch_counters() {
        let patch = SessionPatch {
            end_time: Some(Utc::now()),
            ..SessionPatch::default()
        };
        assert!(!patch.touches_counters());

        let patch = SessionPatch {
            words_studied: Some(0),
            ..SessionPatch::default()
        };
        assert!(patch.touches_counters());
    }

    #[test]
    fn test_negative_counters_rejected() {
        let patch = SessionPatch {
            wrong_count: Some(-1),
            ..SessionPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(SessionPatch::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_counters_rejected() {
        let patch = SessionPatch {
            correct_count: Some(i64::MAX),
            wrong_count: Some(1),
            ..SessionPatch::default()
        };
        assert!(patch.validate().is_err());

        let patch = SessionPatch {
            duration_seconds: Some(MAX_COUNTER_VALUE),
            ..SessionPatch::default()
        };
        assert!(patch.validate().is_ok());
    }
}
