//! # Database Pool Management
//!
//! One [`Database`] handle owns the SQLite connection pool for the
//! whole process. Request handlers clone the handle (cloning is cheap,
//! the pool itself is shared) and reach storage through the repository
//! accessors.
//!
//! ```text
//! axum handler ── db.orders().place(...) ──┐
//! axum handler ── db.inventory().correct() ├──► SqlitePool ──► medimart.db (WAL)
//! seed binary  ── db.users().ensure_user() ┘
//! ```
//!
//! ## SQLite Settings
//! Every connection is opened with:
//! - WAL journal mode, so catalog reads keep flowing while an order
//!   commit is in flight
//! - `synchronous = NORMAL`, which cannot corrupt the file but may drop
//!   the very last commit on power loss
//! - `foreign_keys = ON`; orders reference users and inventory entries,
//!   and SQLite leaves enforcement off unless asked

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::inventory::InventoryRepository;
use crate::repository::order::OrderRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Pool and connection settings.
///
/// Built with [`DbConfig::new`] for a file-backed database or
/// [`DbConfig::in_memory`] for tests, then adjusted through the
/// builder methods.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite file. Created on first connect if missing.
    pub database_path: PathBuf,

    /// Pool capacity. SQLite serializes writes regardless, so this only
    /// needs to cover concurrent readers.
    pub max_connections: u32,

    /// Connections kept warm between requests.
    pub min_connections: u32,

    /// How long an acquire may wait before failing with
    /// [`DbError::PoolExhausted`].
    pub connect_timeout: Duration,

    /// Idle time before a surplus connection is closed.
    pub idle_timeout: Duration,

    /// Apply pending migrations during [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for a file-backed database with the defaults used
    /// by the API server: five connections, 30s acquire timeout,
    /// migrations on.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether migrations run on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Configuration for an isolated in-memory database.
    ///
    /// Capped at a single connection: each `:memory:` connection is its
    /// own empty database, so a second one would see no schema.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared database handle. The entry point for every query in the
/// marketplace.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./medimart.db")).await?;
///
/// let shelves = db.inventory().list_for_store(&store.id).await?;
/// let order = db.orders().place(&patient.id, &entry_id, 2, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database, creating the file if needed, and brings the
    /// schema up to date.
    ///
    /// ## Errors
    /// [`DbError::ConnectionFailed`] when the file cannot be opened,
    /// [`DbError::MigrationFailed`] when a pending migration does not
    /// apply cleanly.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        // mode=rwc creates the file on first run
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Called from [`Database::new`] unless
    /// disabled in the config; idempotent either way.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw connection pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Accounts, store profiles, verification review.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Catalog, shelves, low-stock alerts.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    /// Placement, status transitions, statistics.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Drains the pool on shutdown. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Liveness probe for the health endpoint.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_healthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder_overrides_defaults() {
        let config = DbConfig::new("/tmp/market.db")
            .max_connections(10)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(3));

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(config.run_migrations);
    }

    #[tokio::test]
    async fn test_all_migrations_applied_on_connect() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (embedded, applied) = migrations::migration_status(db.pool()).await.unwrap();

        assert!(embedded >= 2);
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
