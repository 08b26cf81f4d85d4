//! # medimart-db: Database Layer for MediMart
//!
//! This crate provides database access for the MediMart marketplace.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      MediMart Data Flow                                 │
//! │                                                                         │
//! │  HTTP Handler (place_order)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    medimart-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ InventoryRepo │    │ 001_initial  │  │   │
//! │  │   │ Connection    │    │ OrderRepo     │    │ 002_indexes  │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./data/medimart.db  (WAL mode, foreign keys on)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (user, inventory, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medimart_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/medimart.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let shelf = db.inventory().list_for_store(&store_id).await?;
//! let order = db.orders().place(&patient_id, &entry_id, 2, None).await?;
//! ```
//!
//! Writes that must not tear (order placement with its stock decrement,
//! cancellation with its restock) run inside transactions owned by the
//! repositories. Callers never observe a half-applied order.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::{migration_status, run_migrations};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::{
    CatalogFilter, CatalogRow, InventoryCorrection, InventoryRepository, OrderRepository,
    PatientOrderRow, StockRequest, StoreContact, StoreInventoryRow, StoreOrderRow, StoreProfile,
    UserRepository,
};
