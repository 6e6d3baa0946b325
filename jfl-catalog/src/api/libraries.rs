//! Reading library endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use super::{CreatedResponse, Principal};
use crate::models::{Id, ReadingStatus, UserLibraries};
use crate::services::{library_bootstrap, library_service};
use crate::{ApiResult, AppState};

/// Body of POST /api/libraries
#[derive(Debug, Deserialize)]
pub struct CreateLibraryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Body of POST /api/libraries/:id/articles
#[derive(Debug, Deserialize)]
pub struct SaveArticleRequest {
    pub article_id: Id,
    /// One of `to_read`, `reading`, `read`, `abandoned`; defaults to `to_read`
    #[serde(default)]
    pub reading_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/libraries
///
/// The caller's default library (created on first access) and their other
/// libraries.
pub async fn get_user_library(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<UserLibraries>> {
    Ok(Json(
        library_bootstrap::get_user_library(&state.db, principal.user_id).await?,
    ))
}

/// POST /api/libraries
pub async fn create_library(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateLibraryRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = library_service::create_library(
        &state.db,
        principal.user_id,
        &request.name,
        request.description,
        request.is_public,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/libraries/:id
pub async fn update_library(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    library_service::update_library(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/libraries/:id
pub async fn delete_library(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    library_service::delete_library(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/libraries/:id/articles
///
/// **Response:** 201 `{"id": <entry id>}`; 409 if the article is already saved
/// in that library.
pub async fn save_article(
    State(state): State<AppState>,
    principal: Principal,
    Path(library_id): Path<Id>,
    Json(request): Json<SaveArticleRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let reading_status = match request.reading_status.as_deref() {
        Some(raw) => raw.parse::<ReadingStatus>()?,
        None => ReadingStatus::ToRead,
    };

    debug!(
        user_id = principal.user_id,
        library_id,
        article_id = request.article_id,
        "Saving article to library"
    );

    let id = library_service::save_article_to_library(
        &state.db,
        library_id,
        request.article_id,
        reading_status,
        request.notes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Build library routes
pub fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/api/libraries", get(get_user_library).post(create_library))
        .route("/api/libraries/:id", put(update_library).delete(delete_library))
        .route("/api/libraries/:id/articles", post(save_article))
}
