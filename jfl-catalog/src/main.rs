//! jfl-catalog - Journalful article catalog service
//!
//! Serves articles, authors, profiles and reading libraries over HTTP.
//! Article metadata is resolved from the Crossref registry by DOI.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jfl_catalog::services::CrossrefResolver;
use jfl_catalog::{build_router, AppState};
use jfl_common::config::{
    RegistryConfig, RootFolderInitializer, RootFolderResolver, TomlConfig, DEFAULT_HOST,
    DEFAULT_PORT,
};

/// Command-line arguments for jfl-catalog
#[derive(Parser, Debug)]
#[command(name = "jfl-catalog")]
#[command(about = "Article catalog service for Journalful")]
#[command(version)]
struct Args {
    /// Path to a TOML config file (defaults to the platform config location)
    #[arg(short, long, env = "JFL_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database (overrides JFL_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "JFL_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "JFL_PORT")]
    port: Option<u16>,

    /// Metadata registry base URL
    #[arg(long, env = "JFL_REGISTRY_URL")]
    registry_url: Option<String>,

    /// Registry request timeout in seconds
    #[arg(long, env = "JFL_REGISTRY_TIMEOUT_SECS")]
    registry_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jfl_catalog=info,jfl_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting jfl-catalog v{}", env!("CARGO_PKG_VERSION"));

    let toml_config = TomlConfig::load_or_default(args.config.as_deref());

    let root_folder = RootFolderResolver::new("catalog")
        .with_cli_arg(args.root_folder.clone())
        .with_toml_config(toml_config.clone())
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let pool = jfl_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let registry = RegistryConfig::resolve(
        args.registry_url.clone(),
        args.registry_timeout_secs,
        &toml_config,
    );
    info!(
        url = %registry.base_url,
        timeout_secs = registry.timeout.as_secs(),
        "Metadata registry configured"
    );
    let resolver = CrossrefResolver::new(&registry).context("Failed to build registry client")?;

    let state = AppState::new(pool, Arc::new(resolver));
    let app = build_router(state);

    let host = args
        .host
        .or(toml_config.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
