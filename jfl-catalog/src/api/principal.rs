//! Acting user extraction
//!
//! Authentication happens upstream; the gateway forwards the verified user id
//! in the `x-user-id` header. Handlers that act on behalf of a user take a
//! [`Principal`] argument and pass its id down explicitly.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::models::Id;

/// Header carrying the acting user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf a request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Id,
}

impl Principal {
    fn from_parts(parts: &Parts) -> Result<Self, ApiError> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", USER_ID_HEADER)))?;

        let user_id = raw
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<Id>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::Unauthorized(format!("invalid {} header", USER_ID_HEADER)))?;

        Ok(Self { user_id })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Principal::from_parts(parts)
    }
}
