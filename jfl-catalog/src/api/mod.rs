//! HTTP API handlers for jfl-catalog

pub mod articles;
pub mod authors;
pub mod health;
pub mod libraries;
pub mod principal;
pub mod profiles;

pub use articles::article_routes;
pub use authors::author_routes;
pub use health::health_routes;
pub use libraries::library_routes;
pub use principal::{Principal, USER_ID_HEADER};
pub use profiles::profile_routes;

use serde::Serialize;

use crate::models::Id;

/// Body returned by create operations
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Id,
}
