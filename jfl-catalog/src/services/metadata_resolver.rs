//! DOI metadata resolution against the Crossref registry
//!
//! One bounded GET per DOI, no retries. Every failure (transport error,
//! timeout, non-success status, body of the wrong shape) is reported as
//! [`Unavailable`], which callers treat as a signal to fall back to their own
//! data rather than as a hard error.

use async_trait::async_trait;
use jfl_common::config::RegistryConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Metadata could not be obtained for a DOI
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Metadata unavailable for {doi}: {reason}")]
pub struct Unavailable {
    pub doi: String,
    pub reason: String,
}

impl Unavailable {
    fn new(doi: &str, reason: impl Into<String>) -> Self {
        Self {
            doi: doi.to_string(),
            reason: reason.into(),
        }
    }
}

/// Normalized article fields produced by a resolver
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ResolvedMetadata {
    pub doi: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_year: Option<i32>,
    pub journal_name: Option<String>,
    pub url: Option<String>,
    /// "Given Family" display names in registry order
    pub author_names: Vec<String>,
}

/// Source of article metadata keyed by DOI
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolver identifier (e.g., "Crossref")
    fn source_id(&self) -> &'static str;

    /// Resolve metadata for a non-empty DOI
    async fn resolve(&self, doi: &str) -> Result<ResolvedMetadata, Unavailable>;
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefWork,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
    published: Option<CrossrefDate>,
    issued: Option<CrossrefDate>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl CrossrefDate {
    /// First component of the first date fragment
    fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

static JATS_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?jats:[^>]+>").expect("valid JATS tag pattern"));

/// Strip JATS XML markup from Crossref abstracts
fn strip_jats_markup(text: &str) -> String {
    JATS_TAG.replace_all(text, "").trim().to_string()
}

fn first_non_blank(values: Vec<String>) -> Option<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn display_name(author: CrossrefAuthor) -> Option<String> {
    let parts: Vec<String> = [author.given, author.family]
        .into_iter()
        .flatten()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Parse a Crossref `works/<doi>` response body
///
/// A body describing a DOI other than the requested one is rejected.
pub fn parse_work_response(doi: &str, body: &str) -> Result<ResolvedMetadata, Unavailable> {
    let response: CrossrefResponse = serde_json::from_str(body)
        .map_err(|e| Unavailable::new(doi, format!("invalid Crossref JSON: {}", e)))?;
    let work = response.message;

    let publication_year = work
        .published
        .as_ref()
        .and_then(CrossrefDate::year)
        .or_else(|| work.issued.as_ref().and_then(CrossrefDate::year));

    let abstract_text = work
        .abstract_text
        .map(|a| strip_jats_markup(&a))
        .filter(|a| !a.is_empty());

    if let Some(returned) = work.doi.as_deref() {
        if !returned.trim().eq_ignore_ascii_case(doi.trim()) {
            return Err(Unavailable::new(
                doi,
                format!("registry returned a different work ({})", returned),
            ));
        }
    }

    Ok(ResolvedMetadata {
        doi: work.doi.unwrap_or_else(|| doi.to_string()),
        title: first_non_blank(work.title),
        abstract_text,
        publication_year,
        journal_name: first_non_blank(work.container_title),
        url: work.url.filter(|u| !u.trim().is_empty()),
        author_names: work.author.into_iter().filter_map(display_name).collect(),
    })
}

/// Crossref REST API client
pub struct CrossrefResolver {
    http_client: reqwest::Client,
    base_url: String,
}

impl CrossrefResolver {
    pub fn new(config: &RegistryConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `<base_url>/works/<doi>` with each DOI segment percent-encoded
    ///
    /// The DOI's own `/` separators stay path separators; `?`, `#` and the
    /// like are escaped so the whole DOI reaches the registry.
    fn work_url(&self, doi: &str) -> Result<reqwest::Url, Unavailable> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Unavailable::new(doi, format!("invalid registry URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| Unavailable::new(doi, "registry URL cannot take a path"))?
            .pop_if_empty()
            .push("works")
            .extend(doi.split('/'));

        Ok(url)
    }

    async fn fetch(&self, doi: &str) -> Result<ResolvedMetadata, Unavailable> {
        let url = self.work_url(doi)?;

        tracing::debug!(doi = %doi, url = %url, "Querying Crossref API");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Unavailable::new(doi, "request timed out")
                } else {
                    Unavailable::new(doi, format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Unavailable::new(doi, format!("registry returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Unavailable::new(doi, format!("failed to read body: {}", e)))?;

        parse_work_response(doi, &body)
    }
}

#[async_trait]
impl MetadataResolver for CrossrefResolver {
    fn source_id(&self) -> &'static str {
        "Crossref"
    }

    async fn resolve(&self, doi: &str) -> Result<ResolvedMetadata, Unavailable> {
        match self.fetch(doi).await {
            Ok(metadata) => {
                tracing::info!(
                    doi = %doi,
                    title = %metadata.title.as_deref().unwrap_or("Unknown"),
                    authors = metadata.author_names.len(),
                    "Retrieved metadata from Crossref"
                );
                Ok(metadata)
            }
            Err(unavailable) => {
                tracing::warn!(doi = %doi, reason = %unavailable.reason, "Crossref metadata unavailable");
                Err(unavailable)
            }
        }
    }
}
