//! # Database Connection Pool Module
//!
//! Provides the SQLite connection pool backing the favorites store.
//!
//! ## Features
//!
//! - **WAL Mode**: Readers never block the writer on file-backed databases
//! - **Automatic Migrations**: `migrations/` is embedded and applied on open
//! - **Health Checks**: A `SELECT 1` round-trip before the pool is handed out
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_catalog::db::{create_pool, DatabaseConfig};
//!
//! let pool = create_pool(DatabaseConfig::new("spotify_db")).await?;
//! ```
//!
//! ## Testing
//!
//! ```rust,ignore
//! let pool = create_test_pool().await?;
//! ```

use crate::{CatalogError, Result};
use core_runtime::logging::strip_path;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

const MEMORY_URL: &str = "sqlite::memory:";

/// Database configuration for the SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file, `None` for an in-memory database
    pub database_path: Option<PathBuf>,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the pool
    pub acquire_timeout: Duration,

    /// Maximum lifetime of a connection
    pub max_lifetime: Option<Duration>,

    /// Maximum idle time for a connection before being closed
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// Configuration for a database file. `:memory:` selects [`Self::in_memory`].
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        let path = database_path.into();
        if is_memory_path(&path) {
            return Self::in_memory();
        }

        Self {
            database_path: Some(path),
            min_connections: 1,
            max_connections: 4,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Some(Duration::from_secs(1800)),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }

    /// In-memory database for tests and previews.
    ///
    /// The database lives inside a single connection that is never recycled,
    /// so the pool is pinned to exactly one.
    pub fn in_memory() -> Self {
        Self {
            database_path: None,
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: None,
            idle_timeout: None,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.is_none()
    }

    /// Set the minimum number of connections
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set the maximum number of connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection acquire timeout
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn is_memory_path(path: &Path) -> bool {
    path.as_os_str() == ":memory:"
}

/// Open the favorites database
///
/// Configures the connection options, creates the pool, applies pending
/// migrations and performs a health check.
///
/// # Errors
///
/// Returns an error if:
/// - The database file cannot be opened or created
/// - Migrations fail
/// - Health check fails
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    let database = match &config.database_path {
        Some(path) => path.display().to_string(),
        None => MEMORY_URL.to_string(),
    };
    info!(
        database = %strip_path(&database),
        max_connections = config.max_connections,
        "Opening favorites database"
    );

    // Filenames are taken verbatim, never parsed as a URL.
    let connect_options = match &config.database_path {
        Some(path) => SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal),
        None => SqliteConnectOptions::from_str(MEMORY_URL)?,
    }
    .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create connection pool");
            CatalogError::Database(e)
        })?;

    run_migrations(&pool).await?;
    health_check(&pool).await?;

    debug!(connections = pool.size(), "Favorites database ready");
    Ok(pool)
}

/// In-memory pool with migrations applied
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory()).await
}

async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    debug!("Running database migrations");

    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        warn!(error = %e, "Migration failed");
        CatalogError::Migration(e.to_string())
    })?;

    Ok(())
}

async fn health_check(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        CatalogError::Database(e)
    })?;

    Ok(())
}
