//! Author database operations
//!
//! Author names are unique at the storage layer; `insert_author_if_absent`
//! turns a concurrent duplicate insert into a no-op so the caller can adopt
//! the existing row.

use chrono::Utc;
use jfl_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};

use super::timestamp;
use crate::models::{Author, Id};

const AUTHOR_COLUMNS: &str = "id, name, profile_id, created_at, updated_at";

fn author_from_row(row: &SqliteRow) -> Result<Author> {
    Ok(Author {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        profile_id: row.try_get("profile_id")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

/// Load author by id
pub async fn get_author<'e, E>(executor: E, id: Id) -> Result<Option<Author>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM authors WHERE id = ?", AUTHOR_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(author_from_row).transpose()
}

/// Load author by exact name
pub async fn get_author_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Author>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM authors WHERE name = ?", AUTHOR_COLUMNS);
    let row = sqlx::query(&sql).bind(name).fetch_optional(executor).await?;
    row.as_ref().map(author_from_row).transpose()
}

/// Load the author claimed by a profile
pub async fn get_author_by_profile_id<'e, E>(executor: E, profile_id: Id) -> Result<Option<Author>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT {} FROM authors WHERE profile_id = ? ORDER BY id LIMIT 1",
        AUTHOR_COLUMNS
    );
    let row = sqlx::query(&sql).bind(profile_id).fetch_optional(executor).await?;
    row.as_ref().map(author_from_row).transpose()
}

/// All authors ordered by name
pub async fn list_authors<'e, E>(executor: E) -> Result<Vec<Author>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM authors ORDER BY name, id", AUTHOR_COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(executor).await?;
    rows.iter().map(author_from_row).collect()
}

/// Insert an author without a profile link, returning its id
///
/// An existing author with the same name is a conflict.
pub async fn create_author<'e, E>(executor: E, name: &str) -> Result<Id>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO authors (name, profile_id, created_at, updated_at) VALUES (?, NULL, ?, ?)",
    )
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await
    .map_err(|e| Error::from(e).or_conflict(format!("author '{}' already exists", name)))?;

    Ok(result.last_insert_rowid())
}

/// Insert an author unless one with this exact name exists
///
/// Returns true when a row was created. Never fails on a name collision, so a
/// lookup after this call always finds exactly one author.
pub async fn insert_author_if_absent<'e, E>(executor: E, name: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO authors (name, profile_id, created_at, updated_at)
        VALUES (?, NULL, ?, ?)
        ON CONFLICT(name) DO NOTHING
        "#,
    )
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replace an author's name and profile link; false if no such author
pub async fn update_author<'e, E>(
    executor: E,
    id: Id,
    name: &str,
    profile_id: Option<Id>,
) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE authors SET name = ?, profile_id = ?, updated_at = ? WHERE id = ?",
    )
    .bind(name)
    .bind(profile_id)
    .bind(Utc::now())
    .bind(id)
    .execute(executor)
    .await
    .map_err(|e| Error::from(e).or_conflict(format!("author '{}' already exists", name)))?;

    Ok(result.rows_affected() > 0)
}
