//! CLI command implementations
//!
//! Boot sequence shared by both commands:
//! 1. Load and validate the config file
//! 2. Apply the log level
//! 3. Open the connection pool
//! 4. Bootstrap the `items` schema

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::http_server::{shutdown_signal, HttpServer, HttpServerConfig};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};
use crate::session::{Database, DatabaseConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection settings (required)
    pub database: DatabaseConfig,

    /// HTTP listener settings (optional)
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(CliError::config_error("database.url must not be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(CliError::config_error("database.max_connections must be > 0"));
        }

        if self.database.acquire_timeout_secs == 0 {
            return Err(CliError::config_error(
                "database.acquire_timeout_secs must be > 0",
            ));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Create the `items` table and index, then exit
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;

    let rt = runtime()?;
    rt.block_on(async {
        let db = boot(&config).await?;
        db.close().await;
        log_event(Event::DatabaseClosed);
        Ok::<(), CliError>(())
    })
}

/// Boot and serve HTTP until SIGINT/SIGTERM
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let rt = runtime()?;
    rt.block_on(async {
        let db = boot(&config).await?;
        log_event(Event::BootComplete);

        let server = HttpServer::new(config.http.clone(), db.clone());
        let listener = match server.bind().await {
            Ok(listener) => listener,
            Err(e) => {
                db.close().await;
                log_event(Event::DatabaseClosed);
                return Err(CliError::io_error(format!(
                    "Failed to bind {}: {}",
                    config.http.socket_addr(),
                    e
                )));
            }
        };

        let result = server
            .serve(listener, async {
                let signal = shutdown_signal().await;
                log_event_with_fields(Event::ShutdownStart, &[("signal", signal)]);
            })
            .await;

        db.close().await;
        log_event(Event::DatabaseClosed);

        result.map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))?;
        log_event(Event::ShutdownComplete);
        Ok::<(), CliError>(())
    })
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    log_event(Event::BootStart);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", &config_path.display().to_string())],
    );
    Ok(config)
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

async fn boot(config: &Config) -> CliResult<Database> {
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| boot_failed(format!("Failed to connect to database: {}", e)))?;
    log_event(Event::DatabaseConnected);

    if let Err(e) = db.bootstrap().await {
        db.close().await;
        return Err(boot_failed(format!("Schema bootstrap failed: {}", e)));
    }
    log_event(Event::SchemaBootstrapped);

    Ok(db)
}

fn boot_failed(reason: String) -> CliError {
    log_event_with_fields(Event::BootFailed, &[("reason", &reason)]);
    CliError::boot_failed(reason)
}
