use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Notebook {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Raw JSON text as stored.
    pub settings: Option<String>,
}

pub async fn list_notebooks(pool: &SqlitePool) -> Result<Vec<Notebook>, sqlx::Error> {
    sqlx::query_as::<_, Notebook>(
        r#"SELECT * FROM "notebooks" ORDER BY "created_at" DESC, "id" DESC"#,
    )
    .fetch_all(pool)
    .await
}

pub async fn find_notebook(pool: &SqlitePool, id: i64) -> Result<Option<Notebook>, sqlx::Error> {
    sqlx::query_as::<_, Notebook>(r#"SELECT * FROM "notebooks" WHERE "id" = ?"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_notebook(
    pool: &SqlitePool,
    name: &str,
    created_at: DateTime<Utc>,
) -> Result<Notebook, sqlx::Error> {
    sqlx::query_as::<_, Notebook>(
        r#"INSERT INTO "notebooks" ("name", "created_at") VALUES (?, ?) RETURNING *"#,
    )
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn rename_notebook(
    pool: &SqlitePool,
    id: i64,
    name: &str,
) -> Result<Option<Notebook>, sqlx::Error> {
    sqlx::query_as::<_, Notebook>(
        r#"UPDATE "notebooks" SET "name" = ? WHERE "id" = ? RETURNING *"#,
    )
    .bind(name)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn store_settings(
    pool: &SqlitePool,
    id: i64,
    settings: &str,
) -> Result<Option<Notebook>, sqlx::Error> {
    sqlx::query_as::<_, Notebook>(
        r#"UPDATE "notebooks" SET "settings" = ? WHERE "id" = ? RETURNING *"#,
    )
    .bind(settings)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Removes the notebook and, through the foreign key cascade, its words.
pub async fn delete_notebook(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM "notebooks" WHERE "id" = ?"#)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
