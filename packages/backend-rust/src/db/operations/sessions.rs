use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StudySession {
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub words_studied: i64,
    pub duration_seconds: Option<i64>,
}

pub async fn insert_session(
    pool: &SqlitePool,
    start_time: DateTime<Utc>,
) -> Result<StudySession, sqlx::Error> {
    sqlx::query_as::<_, StudySession>(
        r#"
        INSERT INTO "study_sessions" ("start_time", "correct_count", "wrong_count", "words_studied")
        VALUES (?, 0, 0, 0)
        RETURNING *
        "#,
    )
    .bind(start_time)
    .fetch_one(pool)
    .await
}

pub async fn find_session(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<StudySession>, sqlx::Error> {
    sqlx::query_as::<_, StudySession>(r#"SELECT * FROM "study_sessions" WHERE "id" = ?"#)
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn save_session(
    conn: &mut SqliteConnection,
    session: &StudySession,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE "study_sessions"
        SET "end_time" = ?, "correct_count" = ?, "wrong_count" = ?,
            "words_studied" = ?, "duration_seconds" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(session.end_time)
    .bind(session.correct_count)
    .bind(session.wrong_count)
    .bind(session.words_studied)
    .bind(session.duration_seconds)
    .bind(session.id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn latest_session(pool: &SqlitePool) -> Result<Option<StudySession>, sqlx::Error> {
    sqlx::query_as::<_, StudySession>(
        r#"SELECT * FROM "study_sessions" ORDER BY "start_time" DESC, "id" DESC LIMIT 1"#,
    )
    .fetch_optional(pool)
    .await
}
