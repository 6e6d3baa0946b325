//! Article endpoints
//!
//! Creation goes through the ingestion pipeline; the remaining endpoints are
//! thin wrappers over the persistence gateway.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::CreatedResponse;
use crate::db::articles;
use crate::models::{non_blank, require_id, Article, ArticleUpdate, Id};
use crate::services::{CreateArticleRequest, ResolvedMetadata};
use crate::{ApiError, ApiResult, AppState};

/// Body of POST /api/articles/lookup
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub doi: String,
}

/// Query of GET /api/articles/by-doi
#[derive(Debug, Deserialize)]
pub struct DoiQuery {
    pub doi: String,
}

/// POST /api/articles
///
/// **Request:** `{"doi": "10.1/xyz", "title": "...", "authors": ["..."]}`, every
/// field but `doi` optional.
/// **Response:** 201 `{"id": 17}`
pub async fn create_article(
    State(state): State<AppState>,
    Json(request): Json<CreateArticleRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.ingestor.create_article(&request).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /api/articles/lookup
///
/// Registry metadata for a DOI, nothing stored. 404 when the registry has
/// nothing usable.
pub async fn lookup_article(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> ApiResult<Json<ResolvedMetadata>> {
    Ok(Json(state.ingestor.preview(&request.doi).await?))
}

/// GET /api/articles
pub async fn list_articles(State(state): State<AppState>) -> ApiResult<Json<Vec<Article>>> {
    Ok(Json(articles::list_articles(&state.db).await?))
}

/// GET /api/articles/:id
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Article>> {
    let id = require_id(id, "article")?;
    articles::get_article(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("article {} not found", id)))
}

/// GET /api/articles/by-doi?doi=10.1/xyz
pub async fn get_article_by_doi(
    State(state): State<AppState>,
    Query(query): Query<DoiQuery>,
) -> ApiResult<Json<Article>> {
    let doi = non_blank(Some(query.doi))
        .ok_or_else(|| ApiError::BadRequest("DOI is required".to_string()))?;

    articles::get_article_by_doi(&state.db, &doi)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("article with DOI {} not found", doi)))
}

/// PUT /api/articles/:id
///
/// Replaces title, abstract, year and journal. The DOI and author list are
/// fixed at creation.
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(update): Json<ArticleUpdate>,
) -> ApiResult<Json<Article>> {
    let id = require_id(id, "article")?;

    let title = update.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("article title is required".to_string()));
    }
    if let Some(year) = update.publication_year {
        if year <= 0 {
            return Err(ApiError::BadRequest(format!("invalid publication year {}", year)));
        }
    }

    let update = ArticleUpdate {
        title: title.to_string(),
        abstract_text: non_blank(update.abstract_text),
        publication_year: update.publication_year,
        journal_name: non_blank(update.journal_name),
    };

    if !articles::update_article(&state.db, id, &update).await? {
        return Err(ApiError::NotFound(format!("article {} not found", id)));
    }

    info!(article_id = id, "Article updated");

    get_article(State(state), Path(id)).await
}

/// DELETE /api/articles/:id
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    let id = require_id(id, "article")?;

    if !articles::delete_article(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("article {} not found", id)));
    }

    info!(article_id = id, "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Build article routes
pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/api/articles", get(list_articles).post(create_article))
        .route("/api/articles/lookup", post(lookup_article))
        .route("/api/articles/by-doi", get(get_article_by_doi))
        .route(
            "/api/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
}
