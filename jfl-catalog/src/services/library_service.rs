//! Library operations beyond the default library

use jfl_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::{articles, libraries};
use crate::models::{non_blank, require_id, Id, NewLibrary, ReadingStatus};

/// Save an article into a library, returning the entry id
pub async fn save_article_to_library(
    pool: &SqlitePool,
    library_id: Id,
    article_id: Id,
    reading_status: ReadingStatus,
    notes: Option<String>,
) -> Result<Id> {
    let library_id = require_id(library_id, "library")?;
    let article_id = require_id(article_id, "article")?;

    if libraries::get_library_row(pool, library_id).await?.is_none() {
        return Err(Error::NotFound(format!("library {} not found", library_id)));
    }
    if !articles::article_exists(pool, article_id).await? {
        return Err(Error::NotFound(format!("article {} not found", article_id)));
    }

    let notes = non_blank(notes);
    let entry_id = libraries::add_library_article(
        pool,
        library_id,
        article_id,
        reading_status,
        notes.as_deref(),
    )
    .await?;

    info!(
        library_id,
        article_id,
        status = %reading_status,
        "Saved article to library"
    );

    Ok(entry_id)
}

/// Create a named, non-default library for a user
pub async fn create_library(
    pool: &SqlitePool,
    owner_id: Id,
    name: &str,
    description: Option<String>,
    is_public: bool,
) -> Result<Id> {
    let owner_id = require_id(owner_id, "user")?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("library name is required".to_string()));
    }

    let library = NewLibrary {
        owner_id,
        name: name.to_string(),
        description: non_blank(description),
        is_public,
        is_default: false,
    };
    let id = libraries::create_library(pool, &library).await?;

    info!(library_id = id, owner_id, name = %name, "Created library");

    Ok(id)
}

/// Library edits are not available yet
pub async fn update_library(_pool: &SqlitePool, library_id: Id) -> Result<()> {
    Err(Error::Unsupported(format!(
        "updating library {} is not yet supported",
        library_id
    )))
}

/// Library removal is not available yet
pub async fn delete_library(_pool: &SqlitePool, library_id: Id) -> Result<()> {
    Err(Error::Unsupported(format!(
        "deleting library {} is not yet supported",
        library_id
    )))
}
