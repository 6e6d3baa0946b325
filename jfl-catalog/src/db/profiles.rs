//! Profile database operations

use chrono::Utc;
use jfl_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};

use super::timestamp;
use crate::models::{Id, Profile, ProfileFields};

const PROFILE_COLUMNS: &str = "id, user_id, name, bio, institution, created_at, updated_at";

fn profile_from_row(row: &SqliteRow) -> Result<Profile> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        bio: row.try_get("bio")?,
        institution: row.try_get("institution")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

/// Create the profile owned by `user_id`; one profile per user
pub async fn create_profile<'e, E>(executor: E, user_id: Id, fields: &ProfileFields) -> Result<Id>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO profiles (user_id, name, bio, institution, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&fields.name)
    .bind(&fields.bio)
    .bind(&fields.institution)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await
    .map_err(|e| Error::from(e).or_conflict(format!("user {} already has a profile", user_id)))?;

    Ok(result.last_insert_rowid())
}

pub async fn get_profile<'e, E>(executor: E, id: Id) -> Result<Option<Profile>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(profile_from_row).transpose()
}

pub async fn get_profile_by_user<'e, E>(executor: E, user_id: Id) -> Result<Option<Profile>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM profiles WHERE user_id = ?", PROFILE_COLUMNS);
    let row = sqlx::query(&sql).bind(user_id).fetch_optional(executor).await?;
    row.as_ref().map(profile_from_row).transpose()
}

pub async fn list_profiles<'e, E>(executor: E) -> Result<Vec<Profile>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM profiles ORDER BY id", PROFILE_COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(executor).await?;
    rows.iter().map(profile_from_row).collect()
}

/// Replace profile fields; false if no such profile
pub async fn update_profile<'e, E>(executor: E, id: Id, fields: &ProfileFields) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE profiles SET name = ?, bio = ?, institution = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&fields.name)
    .bind(&fields.bio)
    .bind(&fields.institution)
    .bind(Utc::now())
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a profile; authors that claimed it lose the link
pub async fn delete_profile<'e, E>(executor: E, id: Id) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
