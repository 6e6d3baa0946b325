//! Article ingestion pipeline
//!
//! Creates an article from a DOI:
//! 1. resolve registry metadata (failure is not fatal)
//! 2. without metadata, the request's own fields are the only source and the
//!    title is mandatory
//! 3. request fields override resolved fields one by one; a request author
//!    list replaces the resolved list wholesale
//! 4. validate title, authors and publication year before any write
//! 5. insert the article, reconcile authors, and link them in order, all in
//!    one transaction
//!
//! If the request future is dropped mid-way (client went away), the open
//! transaction is dropped with it and rolls back.

use jfl_common::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::articles;
use crate::models::{non_blank, Id, NewArticle};
use crate::services::author_reconciler::reconcile_authors;
use crate::services::metadata_resolver::{MetadataResolver, ResolvedMetadata};

/// CreateArticle request: a DOI plus optional caller-supplied fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateArticleRequest {
    pub doi: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub journal_name: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
}

/// Article fields and author names after resolution and overrides
#[derive(Debug, Clone, PartialEq)]
pub struct MergedArticle {
    pub article: NewArticle,
    pub author_names: Vec<String>,
}

/// Combine resolved metadata with the request's explicit fields
///
/// `resolved` is `None` when the registry was unavailable.
pub fn merge_fields(
    doi: &str,
    resolved: Option<ResolvedMetadata>,
    request: &CreateArticleRequest,
) -> Result<MergedArticle> {
    let title_override = non_blank(request.title.clone());

    let baseline = match resolved {
        Some(metadata) => metadata,
        None => {
            if title_override.is_none() {
                return Err(Error::InvalidInput(
                    "title is required when article metadata is unavailable".to_string(),
                ));
            }
            ResolvedMetadata::default()
        }
    };

    let author_override: Vec<String> = request
        .authors
        .iter()
        .flatten()
        .filter_map(|name| non_blank(Some(name.clone())))
        .collect();

    let title = title_override.or(baseline.title).unwrap_or_default();
    let abstract_text = non_blank(request.abstract_text.clone()).or(baseline.abstract_text);
    let publication_year = request
        .publication_year
        .filter(|year| *year != 0)
        .or(baseline.publication_year);
    let journal_name = non_blank(request.journal_name.clone()).or(baseline.journal_name);
    let author_names = if author_override.is_empty() {
        baseline.author_names
    } else {
        author_override
    };

    if title.trim().is_empty() {
        return Err(Error::InvalidInput("article title is required".to_string()));
    }
    if author_names.is_empty() {
        return Err(Error::InvalidInput("at least one author is required".to_string()));
    }
    let publication_year = match publication_year {
        Some(year) if year > 0 => year,
        Some(year) => {
            return Err(Error::InvalidInput(format!("invalid publication year {}", year)))
        }
        None => return Err(Error::InvalidInput("publication year is required".to_string())),
    };

    Ok(MergedArticle {
        article: NewArticle {
            doi: doi.to_string(),
            title,
            abstract_text,
            publication_year: Some(publication_year),
            journal_name,
            url: baseline.url,
        },
        author_names,
    })
}

/// Orchestrates resolver, reconciler and gateway to create articles
#[derive(Clone)]
pub struct ArticleIngestor {
    pool: SqlitePool,
    resolver: Arc<dyn MetadataResolver>,
}

impl ArticleIngestor {
    pub fn new(pool: SqlitePool, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self { pool, resolver }
    }

    /// Create an article and its ordered author links, returning the article id
    pub async fn create_article(&self, request: &CreateArticleRequest) -> Result<Id> {
        let doi = request.doi.trim();
        if doi.is_empty() {
            return Err(Error::InvalidInput("DOI is required".to_string()));
        }

        if articles::doi_exists(&self.pool, doi).await? {
            return Err(Error::Conflict(format!("article with DOI {} already exists", doi)));
        }

        let resolved = match self.resolver.resolve(doi).await {
            Ok(metadata) => Some(metadata),
            Err(unavailable) => {
                warn!(
                    doi = %doi,
                    source = self.resolver.source_id(),
                    reason = %unavailable.reason,
                    "Metadata unavailable, using request fields"
                );
                None
            }
        };

        let merged = merge_fields(doi, resolved, request)?;
        let article_id = self.persist(&merged).await?;

        info!(
            article_id,
            doi = %doi,
            title = %merged.article.title,
            authors = merged.author_names.len(),
            "Article created"
        );

        Ok(article_id)
    }

    /// Resolve metadata for a DOI without storing anything
    pub async fn preview(&self, doi: &str) -> Result<ResolvedMetadata> {
        let doi = doi.trim();
        if doi.is_empty() {
            return Err(Error::InvalidInput("DOI is required".to_string()));
        }

        self.resolver
            .resolve(doi)
            .await
            .map_err(|unavailable| Error::NotFound(unavailable.to_string()))
    }

    /// Article row, author reconciliation and links as one unit of work
    async fn persist(&self, merged: &MergedArticle) -> Result<Id> {
        let mut tx = self.pool.begin().await?;

        let article_id = articles::create_article(&mut *tx, &merged.article).await?;
        let authors = reconcile_authors(&mut tx, &merged.author_names).await?;

        for (position, author) in authors.iter().enumerate() {
            let author_order = position as i32 + 1;
            articles::add_article_author(&mut *tx, article_id, author.id, author_order).await?;
        }

        tx.commit().await?;

        Ok(article_id)
    }
}
