//! Article records and their ordered author links

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

/// Stored article with its authors in link order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: Id,
    /// Immutable after creation
    pub doi: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_year: Option<i32>,
    pub journal_name: Option<String>,
    pub url: Option<String>,
    pub authors: Vec<ArticleAuthor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One author link of an article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleAuthor {
    pub author_id: Id,
    pub name: String,
    /// 1-based position in the author list
    pub author_order: i32,
    pub note: Option<String>,
}

/// Fields of an article about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub doi: String,
    pub title: String,
    pub abstract_text: Option<String>,
    pub publication_year: Option<i32>,
    pub journal_name: Option<String>,
    pub url: Option<String>,
}

/// Field replacement for an existing article
///
/// The DOI is not part of the update; it never changes after creation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleUpdate {
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub journal_name: Option<String>,
}
