//! CLI command implementations
//!
//! Boot sequence for `start`: load config, open and migrate the store,
//! build the HTTP server, then enter the serving loop on a fresh tokio
//! runtime. `init` writes a default config file and creates the database
//! tables so the data directory is inspectable before the first start.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::rest_api::{LABELS, POSTS};
use crate::store::SqliteStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Service configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// HTTP server settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_database_path() -> String {
    "pinboard.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file; a missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("invalid config JSON: {}", e)))?;

        Ok(config)
    }
}

/// Entry point called from main
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Init { config } => init(&config),
        Command::Start { config } => start(&config),
    }
}

/// Write a default config file and create the database tables.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized());
    }

    let config = Config::default();
    let content = serde_json::to_string_pretty(&config)?;
    fs::write(config_path, content)?;

    open_store(&config)?;
    println!(
        "initialized {} and {}",
        config_path.display(),
        config.database_path
    );
    Ok(())
}

/// Boot the store and serve the API until the process is stopped.
pub fn start(config_path: &Path) -> CliResult<()> {
    init_tracing();

    let config = Config::load(config_path)?;
    let store = open_store(&config)?;
    let server = HttpServer::new(Arc::new(store), config.http.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Open the SQLite store and create any missing tables.
fn open_store(config: &Config) -> CliResult<SqliteStore> {
    let store = SqliteStore::open(&config.database_path)
        .map_err(|e| CliError::boot_failed(format!("failed to open database: {}", e)))?;
    store
        .migrate(&[&POSTS, &LABELS])
        .map_err(|e| CliError::boot_failed(format!("failed to migrate database: {}", e)))?;

    info!(path = %config.database_path, "database ready");
    Ok(store)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
