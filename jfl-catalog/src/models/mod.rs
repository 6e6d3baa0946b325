//! Catalog domain models

pub mod article;
pub mod author;
pub mod library;
pub mod profile;

pub use article::{Article, ArticleAuthor, ArticleUpdate, NewArticle};
pub use author::Author;
pub use library::{Library, LibraryArticle, NewLibrary, ReadingStatus, UserLibraries};
pub use profile::{Profile, ProfileFields};

/// Row identifier (SQLite INTEGER PRIMARY KEY)
pub type Id = i64;

/// Reject the zero id, which never names a row
pub fn require_id(id: Id, what: &str) -> jfl_common::Result<Id> {
    if id <= 0 {
        return Err(jfl_common::Error::InvalidInput(format!("{} id is required", what)));
    }
    Ok(id)
}

/// Treat blank strings as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
