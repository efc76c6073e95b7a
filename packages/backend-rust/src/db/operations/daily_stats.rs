use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

/// Study totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DailyStat {
    /// `None` until the record has been written.
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub study_time_seconds: i64,
    pub words_studied: i64,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub accuracy_rate: f64,
}

pub async fn find_by_date(
    conn: &mut SqliteConnection,
    date: NaiveDate,
) -> Result<Option<DailyStat>, sqlx::Error> {
    sqlx::query_as::<_, DailyStat>(r#"SELECT * FROM "daily_stats" WHERE "date" = ? LIMIT 1"#)
        .bind(date)
        .fetch_optional(conn)
        .await
}

/// Writes the full record, keyed by its date.
pub async fn upsert(
    conn: &mut SqliteConnection,
    stat: &DailyStat,
) -> Result<DailyStat, sqlx::Error> {
    sqlx::query_as::<_, DailyStat>(
        r#"
        INSERT INTO "daily_stats"
            ("date", "study_time_seconds", "words_studied", "correct_count", "wrong_count", "accuracy_rate")
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT ("date") DO UPDATE SET
            "study_time_seconds" = excluded."study_time_seconds",
            "words_studied" = excluded."words_studied",
            "correct_count" = excluded."correct_count",
            "wrong_count" = excluded."wrong_count",
            "accuracy_rate" = excluded."accuracy_rate"
        RETURNING *
        "#,
    )
    .bind(stat.date)
    .bind(stat.study_time_seconds)
    .bind(stat.words_studied)
    .bind(stat.correct_count)
    .bind(stat.wrong_count)
    .bind(stat.accuracy_rate)
    .fetch_one(conn)
    .await
}

pub async fn list_since(pool: &SqlitePool, from: NaiveDate) -> Result<Vec<DailyStat>, sqlx::Error> {
    sqlx::query_as::<_, DailyStat>(
        r#"SELECT * FROM "daily_stats" WHERE "date" >= ? ORDER BY "date" ASC"#,
    )
    .bind(from)
    .fetch_all(pool)
    .await
}
