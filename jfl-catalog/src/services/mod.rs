//! Catalog services
//!
//! Business operations composed from the persistence gateway and the
//! external metadata registry.

pub mod article_ingest;
pub mod author_reconciler;
pub mod library_bootstrap;
pub mod library_service;
pub mod metadata_resolver;

pub use article_ingest::{ArticleIngestor, CreateArticleRequest};
pub use author_reconciler::reconcile_authors;
pub use library_bootstrap::{get_or_create_default_library, get_user_library};
pub use metadata_resolver::{CrossrefResolver, MetadataResolver, ResolvedMetadata, Unavailable};
