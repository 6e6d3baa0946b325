//! Profile endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;

use super::{CreatedResponse, Principal};
use crate::db::{authors, profiles};
use crate::models::{non_blank, require_id, Author, Id, Profile, ProfileFields};
use crate::{ApiError, ApiResult, AppState};

fn validated(fields: ProfileFields) -> ApiResult<ProfileFields> {
    let name = fields.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("profile name is required".to_string()));
    }

    Ok(ProfileFields {
        name: name.to_string(),
        bio: non_blank(fields.bio),
        institution: non_blank(fields.institution),
    })
}

/// GET /api/profiles
pub async fn list_profiles(State(state): State<AppState>) -> ApiResult<Json<Vec<Profile>>> {
    Ok(Json(profiles::list_profiles(&state.db).await?))
}

/// GET /api/profiles/me
pub async fn get_my_profile(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Profile>> {
    profiles::get_profile_by_user(&state.db, principal.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("user {} has no profile", principal.user_id))
        })
}

/// POST /api/profiles
///
/// Creates the caller's profile. A user has at most one (409 otherwise).
pub async fn create_profile(
    State(state): State<AppState>,
    principal: Principal,
    Json(fields): Json<ProfileFields>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let fields = validated(fields)?;
    let id = profiles::create_profile(&state.db, principal.user_id, &fields).await?;

    info!(profile_id = id, user_id = principal.user_id, "Profile created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /api/profiles/:id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Profile>> {
    let id = require_id(id, "profile")?;
    profiles::get_profile(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("profile {} not found", id)))
}

/// PUT /api/profiles/:id
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(fields): Json<ProfileFields>,
) -> ApiResult<Json<Profile>> {
    let id = require_id(id, "profile")?;
    let fields = validated(fields)?;

    if !profiles::update_profile(&state.db, id, &fields).await? {
        return Err(ApiError::NotFound(format!("profile {} not found", id)));
    }

    get_profile(State(state), Path(id)).await
}

/// DELETE /api/profiles/:id
///
/// Authors that claimed the profile keep existing, unclaimed.
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    let id = require_id(id, "profile")?;

    if !profiles::delete_profile(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("profile {} not found", id)));
    }

    info!(profile_id = id, "Profile deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/profiles/:id/author
pub async fn get_profile_author(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Author>> {
    let id = require_id(id, "profile")?;
    authors::get_author_by_profile_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no author claimed by profile {}", id)))
}

/// Build profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profiles", get(list_profiles).post(create_profile))
        .route("/api/profiles/me", get(get_my_profile))
        .route(
            "/api/profiles/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/api/profiles/:id/author", get(get_profile_author))
}
