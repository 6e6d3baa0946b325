//! jfl-catalog library interface
//!
//! Article catalog, author identities, profiles and reading libraries,
//! exposed over HTTP. The binary wires configuration and the registry client;
//! integration tests build the same router over an in-memory database.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::{ArticleIngestor, MetadataResolver};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Article creation pipeline
    pub ingestor: ArticleIngestor,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self {
            ingestor: ArticleIngestor::new(db.clone(), resolver),
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::article_routes())
        .merge(api::author_routes())
        .merge(api::profile_routes())
        .merge(api::library_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
