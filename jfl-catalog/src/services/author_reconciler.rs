//! Author reconciliation
//!
//! Maps free-text author names onto stable author identities. Identity is the
//! exact name string: "Jane Doe" and "jane doe" are different authors.
//!
//! Runs on a caller-supplied connection so ingestion can reconcile inside its
//! own transaction. A name created concurrently by another request collides
//! on the unique name index; the collision is absorbed and the other
//! request's row is adopted.

use jfl_common::{Error, Result};
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::db::authors;
use crate::models::Author;

/// Resolve each name to an author, creating authors for unknown names
///
/// The result has one entry per input name, in input order. Repeated names
/// resolve to the same author. Any persistence failure aborts the whole call.
pub async fn reconcile_authors(conn: &mut SqliteConnection, names: &[String]) -> Result<Vec<Author>> {
    if names.is_empty() {
        return Err(Error::InvalidInput("at least one author name is required".to_string()));
    }
    if let Some(position) = names.iter().position(|n| n.trim().is_empty()) {
        return Err(Error::InvalidInput(format!(
            "author name at position {} is empty",
            position + 1
        )));
    }

    let mut identities = Vec::with_capacity(names.len());
    let mut created = 0usize;

    for name in names {
        if let Some(existing) = authors::get_author_by_name(&mut *conn, name).await? {
            debug!(author_id = existing.id, name = %name, "Reusing existing author");
            identities.push(existing);
            continue;
        }

        if authors::insert_author_if_absent(&mut *conn, name).await? {
            created += 1;
        } else {
            debug!(name = %name, "Author created concurrently, adopting existing row");
        }

        let author = authors::get_author_by_name(&mut *conn, name)
            .await?
            .ok_or_else(|| Error::Internal(format!("author '{}' missing after insert", name)))?;
        identities.push(author);
    }

    info!(
        authors = identities.len(),
        created,
        "Reconciled author names"
    );

    Ok(identities)
}
