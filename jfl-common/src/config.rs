//! Configuration loading and root folder resolution
//!
//! Priority order for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Command-line and environment values arrive together through clap's `env`
//! support in the service binary; this module handles tiers 3 and 4 and the
//! root folder environment override.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "JFL_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "journalful.db";

/// Default metadata registry endpoint
pub const DEFAULT_REGISTRY_URL: &str = "https://api.crossref.org/v1";

/// Default registry request timeout in seconds
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;

/// Default listen address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port
pub const DEFAULT_PORT: u16 = 50051;

/// Contents of the optional TOML config file
///
/// Every field is optional; a missing file or missing field falls through to
/// the compiled default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub registry_url: Option<String>,
    pub registry_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl TomlConfig {
    /// Parse config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))
    }

    /// Load config from an explicit file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load config from the platform config location
    ///
    /// A missing or unreadable file is not fatal: a warning is logged and the
    /// defaults are used.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Self {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Ok(path) => path,
                Err(_) => {
                    info!("No config file found, using defaults");
                    return Self::default();
                }
            },
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config file {}: {} (using defaults)", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Settings for the external bibliographic registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Base URL; works are fetched from `<base_url>/works/<doi>`
    pub base_url: String,
    /// Bound on the single outbound request
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REGISTRY_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

impl RegistryConfig {
    /// Resolve registry settings: explicit (CLI/ENV) value, then TOML, then default
    pub fn resolve(
        url: Option<String>,
        timeout_secs: Option<u64>,
        toml_config: &TomlConfig,
    ) -> Self {
        let defaults = Self::default();
        let base_url = url
            .or_else(|| toml_config.registry_url.clone())
            .unwrap_or(defaults.base_url);
        let timeout = timeout_secs
            .or(toml_config.registry_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let user_agent = toml_config
            .user_agent
            .clone()
            .unwrap_or(defaults.user_agent);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            user_agent,
        }
    }
}

fn default_user_agent() -> String {
    format!("Journalful/{}", env!("CARGO_PKG_VERSION"))
}

/// Resolves the root folder holding the database
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_config: TomlConfig,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_config: TomlConfig::default(),
        }
    }

    /// Command-line root folder (priority 1)
    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    /// Loaded TOML config (priority 3)
    pub fn with_toml_config(mut self, toml_config: TomlConfig) -> Self {
        self.toml_config = toml_config;
        self
    }

    /// Resolve the root folder; never fails, the compiled default is last resort
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!(module = %self.module_name, "Root folder from command line: {}", path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                info!(module = %self.module_name, "Root folder from {}: {}", ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_config.root_folder {
            info!(module = %self.module_name, "Root folder from config file: {}", path.display());
            return path.clone();
        }

        let path = default_root_folder();
        info!(module = %self.module_name, "Root folder (default): {}", path.display());
        path
    }
}

/// Creates the root folder and locates the database inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

/// Get default configuration file path for the platform
fn default_config_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("journalful").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/journalful/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("journalful"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/journalful"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("journalful"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/journalful"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("journalful"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\journalful"))
    } else {
        PathBuf::from("./journalful_data")
    }
}
