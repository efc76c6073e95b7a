use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Word {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub notebook_id: i64,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub last_studied: Option<DateTime<Utc>>,
    pub mastered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WordSearchHit {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub mastered: bool,
    pub notebook_id: i64,
    pub notebook_name: String,
}

pub async fn list_words(
    pool: &SqlitePool,
    notebook_id: Option<i64>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Word>, sqlx::Error> {
    sqlx::query_as::<_, Word>(
        r#"
        SELECT * FROM "words"
        WHERE (?1 IS NULL OR "notebook_id" = ?1)
        ORDER BY "id" ASC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(notebook_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

pub async fn list_wrong_words(
    pool: &SqlitePool,
    notebook_id: Option<i64>,
) -> Result<Vec<Word>, sqlx::Error> {
    sqlx::query_as::<_, Word>(
        r#"
        SELECT * FROM "words"
        WHERE "wrong_count" > 0 AND (?1 IS NULL OR "notebook_id" = ?1)
        ORDER BY "id" ASC
        "#,
    )
    .bind(notebook_id)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match over both the word and its meaning,
/// across every notebook. Both sides go through SQLite `LOWER()`, which
/// folds ASCII letters only.
pub async fn search_words(pool: &SqlitePool, query: &str) -> Result<Vec<WordSearchHit>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(query));
    sqlx::query_as::<_, WordSearchHit>(
        r#"
        SELECT w."id", w."word", w."meaning", w."correct_count", w."wrong_count",
               w."mastered", w."notebook_id", n."name" AS "notebook_name"
        FROM "words" w
        JOIN "notebooks" n ON n."id" = w."notebook_id"
        WHERE LOWER(w."word") LIKE LOWER(?1) ESCAPE '\' OR LOWER(w."meaning") LIKE LOWER(?1) ESCAPE '\'
        ORDER BY w."id" ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub async fn find_word(pool: &SqlitePool, id: i64) -> Result<Option<Word>, sqlx::Error> {
    sqlx::query_as::<_, Word>(r#"SELECT * FROM "words" WHERE "id" = ?"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_word(
    conn: &mut SqliteConnection,
    notebook_id: i64,
    word: &str,
    meaning: &str,
) -> Result<Word, sqlx::Error> {
    sqlx::query_as::<_, Word>(
        r#"INSERT INTO "words" ("word", "meaning", "notebook_id") VALUES (?, ?, ?) RETURNING *"#,
    )
    .bind(word)
    .bind(meaning)
    .bind(notebook_id)
    .fetch_one(conn)
    .await
}

pub async fn update_word_text(
    pool: &SqlitePool,
    id: i64,
    word: &str,
    meaning: &str,
) -> Result<Option<Word>, sqlx::Error> {
    sqlx::query_as::<_, Word>(
        r#"UPDATE "words" SET "word" = ?, "meaning" = ? WHERE "id" = ? RETURNING *"#,
    )
    .bind(word)
    .bind(meaning)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_word(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM "words" WHERE "id" = ?"#)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Counts one answer and stamps `last_studied`. `mastered` is only written
/// when provided.
pub async fn record_answer(
    pool: &SqlitePool,
    id: i64,
    correct: bool,
    mastered: Option<bool>,
    studied_at: DateTime<Utc>,
) -> Result<Option<Word>, sqlx::Error> {
    sqlx::query_as::<_, Word>(
        r#"
        UPDATE "words"
        SET "correct_count" = "correct_count" + ?1,
            "wrong_count" = "wrong_count" + ?2,
            "last_studied" = ?3,
            "mastered" = COALESCE(?4, "mastered")
        WHERE "id" = ?5
        RETURNING *
        "#,
    )
    .bind(i64::from(correct))
    .bind(i64::from(!correct))
    .bind(studied_at)
    .bind(mastered)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn reset_notebook_progress(pool: &SqlitePool, notebook_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE "words"
        SET "correct_count" = 0, "wrong_count" = 0, "mastered" = 0, "last_studied" = NULL
        WHERE "notebook_id" = ?
        "#,
    )
    .bind(notebook_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("plain"), "plain");
    }
}
