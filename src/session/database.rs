//! Database handle and pool configuration

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::store::{schema, StoreResult};

use super::unit_of_work::UnitOfWork;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://items.db` or `sqlite::memory:`
    pub url: String,

    /// Pool size (default: 5). Ignored for in-memory databases.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a request waits for a free connection (default: 30)
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl DatabaseConfig {
    /// Create a config for the given URL with default pool settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }

    /// Whether the URL names a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&self.url)?;
        if self.is_in_memory() {
            return Ok(options);
        }
        Ok(options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options =
            SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(self.acquire_timeout_secs));

        // Every connection to `:memory:` is a separate database, so the pool
        // must hold exactly one connection for its whole lifetime.
        if self.is_in_memory() {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options.max_connections(self.max_connections)
        }
    }
}

/// Handle to the item database.
///
/// Cheap to clone; clones share one connection pool. Constructed once by the
/// caller and passed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the connection pool
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await?;
        Ok(Self { pool })
    }

    /// Create the `items` table and index if missing
    pub async fn bootstrap(&self) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        schema::bootstrap(&mut conn).await
    }

    /// Borrow a connection and open a transaction on it
    pub async fn begin(&self) -> StoreResult<UnitOfWork> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork::new(tx))
    }

    /// Close the pool, waiting for borrowed connections to come back
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Whether [`Database::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_json() {
        let config: DatabaseConfig = serde_json::from_str(r#"{"url": "sqlite://items.db"}"#).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(DatabaseConfig::new("sqlite::memory:").is_in_memory());
        assert!(DatabaseConfig::new("sqlite://file:items?mode=memory&cache=shared").is_in_memory());
        assert!(!DatabaseConfig::new("sqlite:///var/lib/items.db").is_in_memory());
    }

    #[tokio::test]
    async fn test_connect_and_close() {
        let db = Database::connect(&DatabaseConfig::new("sqlite::memory:"))
            .await
            .unwrap();
        db.bootstrap().await.unwrap();
        assert!(!db.is_closed());

        db.close().await;
        assert!(db.is_closed());
        assert!(db.begin().await.is_err());
    }

    #[tokio::test]
    async fn test_connect_creates_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("items.db");
        let config = DatabaseConfig::new(format!("sqlite://{}", path.display()));

        let db = Database::connect(&config).await.unwrap();
        db.bootstrap().await.unwrap();
        assert!(path.exists());
        db.close().await;
    }
}
