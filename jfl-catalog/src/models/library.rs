//! Reading libraries
//!
//! Every user owns at most one default library plus any number of named
//! libraries. Library entries carry a reading status per saved article.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Id;

/// Name given to a lazily created default library
pub const DEFAULT_LIBRARY_NAME: &str = "My Library";

/// Description given to a lazily created default library
pub const DEFAULT_LIBRARY_DESCRIPTION: &str = "This is my default library.";

/// A user's progress on a saved article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    ToRead,
    Reading,
    Read,
    Abandoned,
}

impl ReadingStatus {
    /// Stored integer code
    pub fn code(self) -> i64 {
        match self {
            ReadingStatus::ToRead => 1,
            ReadingStatus::Reading => 2,
            ReadingStatus::Read => 3,
            ReadingStatus::Abandoned => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ReadingStatus::ToRead),
            2 => Some(ReadingStatus::Reading),
            3 => Some(ReadingStatus::Read),
            4 => Some(ReadingStatus::Abandoned),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReadingStatus::ToRead => "to_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
            ReadingStatus::Abandoned => "abandoned",
        };
        f.write_str(label)
    }
}

impl FromStr for ReadingStatus {
    type Err = jfl_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "to_read" => Ok(ReadingStatus::ToRead),
            "reading" => Ok(ReadingStatus::Reading),
            "read" => Ok(ReadingStatus::Read),
            "abandoned" => Ok(ReadingStatus::Abandoned),
            other => Err(jfl_common::Error::InvalidInput(format!(
                "unknown reading status '{}'",
                other
            ))),
        }
    }
}

/// A library with its hydrated entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Library {
    pub id: Id,
    pub owner_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_default: bool,
    pub articles: Vec<LibraryArticle>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An article saved in a library, joined with the article's headline fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryArticle {
    pub id: Id,
    pub library_id: Id,
    pub article_id: Id,
    pub reading_status: ReadingStatus,
    pub notes: Option<String>,
    pub date_added: DateTime<Utc>,
    pub article_title: String,
    pub doi: String,
    pub publication_year: Option<i32>,
}

/// Fields of a library about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewLibrary {
    pub owner_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_default: bool,
}

impl NewLibrary {
    /// The default library every user receives on first access
    pub fn default_for(owner_id: Id) -> Self {
        Self {
            owner_id,
            name: DEFAULT_LIBRARY_NAME.to_string(),
            description: Some(DEFAULT_LIBRARY_DESCRIPTION.to_string()),
            is_public: true,
            is_default: true,
        }
    }
}

/// A user's library set: the default library and every other library
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLibraries {
    pub default_library: Library,
    pub other_libraries: Vec<Library>,
}
