//! Lazy default library creation
//!
//! A user's default library is created on first access. Concurrent first
//! accesses race on the single-default index; the loser's insert is a no-op
//! and both callers read back the same row.

use jfl_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::libraries;
use crate::models::{require_id, Id, Library, UserLibraries};

/// Return the user's default library, creating it if absent
pub async fn get_or_create_default_library(pool: &SqlitePool, user_id: Id) -> Result<Library> {
    let user_id = require_id(user_id, "user")?;

    if let Some(existing) = libraries::get_default_library(pool, user_id).await? {
        return Ok(existing);
    }

    if libraries::insert_default_library_if_absent(pool, user_id).await? {
        info!(user_id, "Created default library");
    }

    libraries::get_default_library(pool, user_id)
        .await?
        .ok_or_else(|| {
            Error::Internal(format!("default library for user {} missing after insert", user_id))
        })
}

/// The user's default library plus all of their other libraries
pub async fn get_user_library(pool: &SqlitePool, user_id: Id) -> Result<UserLibraries> {
    let default_library = get_or_create_default_library(pool, user_id).await?;

    let other_libraries = libraries::list_other_libraries(pool, user_id).await?;

    Ok(UserLibraries {
        default_library,
        other_libraries,
    })
}
