//! # Schema Migrations
//!
//! The marketplace schema is embedded in the binary and applied on
//! startup. There is no runtime dependency on SQL files being present
//! next to the executable.
//!
//! ## Schema History
//!
//! | File                      | Contents                                  |
//! |---------------------------|-------------------------------------------|
//! | `001_initial_schema.sql`  | users, medicines, inventory_entries, orders |
//! | `002_indexes.sql`         | Indexes for catalog search and dashboards |
//!
//! Applied versions are tracked in the `_sqlx_migrations` table, so
//! re-running the set is a no-op for everything already recorded.
//!
//! ## Rules
//! - Migrations are append-only. A released file is never edited; fixes
//!   land as a new numbered file.
//! - File names follow `NNN_description.sql` and run in numeric order.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// All migrations under `migrations/sqlite`, embedded at compile time
/// by `sqlx::migrate!`.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date, applying any embedded migrations the
/// database has not yet recorded.
///
/// Each migration runs in its own transaction and is recorded with its
/// checksum, so a partially applied file cannot be silently skipped on
/// the next start.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let embedded = MIGRATOR.migrations.len();
    debug!(embedded, "Applying schema migrations");

    MIGRATOR.run(pool).await?;

    info!(embedded, "Schema is up to date");
    Ok(())
}

/// Reports `(embedded, applied)` migration counts.
///
/// Used by diagnostics to spot a database that is behind the binary
/// (or ahead of it, after a bad rollback).
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied = match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
    {
        Ok(count) => count as usize,
        // The tracking table does not exist until the first run.
        Err(_) => 0,
    };

    Ok((embedded, applied))
}
