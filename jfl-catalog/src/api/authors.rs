//! Author endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::db::{authors, profiles};
use crate::models::{require_id, Author, Id};
use crate::{ApiError, ApiResult, AppState};

/// Body of PUT /api/authors/:id
///
/// `profile_id: null` (or absent) removes any profile claim.
#[derive(Debug, Deserialize)]
pub struct UpdateAuthorRequest {
    pub name: String,
    #[serde(default)]
    pub profile_id: Option<Id>,
}

/// GET /api/authors
pub async fn list_authors(State(state): State<AppState>) -> ApiResult<Json<Vec<Author>>> {
    Ok(Json(authors::list_authors(&state.db).await?))
}

/// GET /api/authors/:id
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Author>> {
    let id = require_id(id, "author")?;
    authors::get_author(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("author {} not found", id)))
}

/// PUT /api/authors/:id
///
/// Renaming onto an existing author's name is a conflict.
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(request): Json<UpdateAuthorRequest>,
) -> ApiResult<Json<Author>> {
    let id = require_id(id, "author")?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("author name is required".to_string()));
    }

    let profile_id = match request.profile_id {
        Some(profile_id) => {
            let profile_id = require_id(profile_id, "profile")?;
            if profiles::get_profile(&state.db, profile_id).await?.is_none() {
                return Err(ApiError::NotFound(format!("profile {} not found", profile_id)));
            }
            Some(profile_id)
        }
        None => None,
    };

    if !authors::update_author(&state.db, id, name, profile_id).await? {
        return Err(ApiError::NotFound(format!("author {} not found", id)));
    }

    info!(author_id = id, profile_id = ?profile_id, "Author updated");

    get_author(State(state), Path(id)).await
}

/// Build author routes
pub fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/api/authors", get(list_authors))
        .route("/api/authors/:id", get(get_author).put(update_author))
}
