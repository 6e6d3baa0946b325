//! Shared utilities for jfl-catalog integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use jfl_catalog::services::{MetadataResolver, ResolvedMetadata, Unavailable};
use jfl_catalog::{build_router, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Resolver returning a fixed answer and counting calls
pub struct StubResolver {
    metadata: Option<ResolvedMetadata>,
    calls: AtomicUsize,
}

impl StubResolver {
    /// Resolver that always succeeds with `metadata`
    pub fn returning(metadata: ResolvedMetadata) -> Arc<Self> {
        Arc::new(Self {
            metadata: Some(metadata),
            calls: AtomicUsize::new(0),
        })
    }

    /// Resolver that is always unavailable
    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            metadata: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataResolver for StubResolver {
    fn source_id(&self) -> &'static str {
        "Stub"
    }

    async fn resolve(&self, doi: &str) -> Result<ResolvedMetadata, Unavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.metadata {
            Some(metadata) => Ok(ResolvedMetadata {
                doi: doi.to_string(),
                ..metadata.clone()
            }),
            None => Err(Unavailable {
                doi: doi.to_string(),
                reason: "registry offline".to_string(),
            }),
        }
    }
}

/// Registry answer used across tests: "Foo" by Jane Doe and John Roe, 2020
pub fn foo_metadata() -> ResolvedMetadata {
    ResolvedMetadata {
        doi: "10.1/xyz".to_string(),
        title: Some("Foo".to_string()),
        abstract_text: Some("About foo".to_string()),
        publication_year: Some(2020),
        journal_name: Some("Journal of Foo".to_string()),
        url: Some("https://doi.org/10.1/xyz".to_string()),
        author_names: vec!["Jane Doe".to_string(), "John Roe".to_string()],
    }
}

/// Create test app over a fresh in-memory database
pub async fn create_test_app(resolver: Arc<dyn MetadataResolver>) -> (Router, SqlitePool) {
    let pool = jfl_common::db::init_memory_database()
        .await
        .expect("Failed to create in-memory database");

    let app = build_router(AppState::new(pool.clone(), resolver));
    (app, pool)
}

/// JSON request, optionally on behalf of a user
pub fn json_request(method: &str, uri: &str, user_id: Option<i64>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Bodiless request, optionally on behalf of a user
pub fn empty_request(method: &str, uri: &str, user_id: Option<i64>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    builder.body(Body::empty()).expect("Failed to build request")
}

/// Collect a response body as JSON (Null for an empty body)
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
