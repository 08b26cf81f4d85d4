//! # Repository Module
//!
//! Database repository implementations for MediMart.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.inventory().search_catalog(params)                         │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                   │
//! │  ├── add_or_merge(&self, store_id, request)                            │
//! │  ├── correct(&self, store_id, entry_id, changes)                       │
//! │  ├── deactivate(&self, store_id, entry_id)                             │
//! │  └── search_catalog(&self, params)                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Ownership is part of every WHERE clause: a store's queries are        │
//! │  scoped by store_id, a patient's by patient_id. A row someone else     │
//! │  owns is indistinguishable from a missing row.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Accounts, store onboarding, verification
//! - [`inventory::InventoryRepository`] - Catalog, shelves, low-stock alerts
//! - [`order::OrderRepository`] - Placement, status transitions, statistics

pub mod inventory;
pub mod order;
pub mod user;

pub use inventory::{
    CatalogFilter, CatalogRow, InventoryCorrection, InventoryRepository, StockRequest,
    StoreInventoryRow,
};
pub use order::{OrderRepository, PatientOrderRow, StoreOrderRow};
pub use user::{StoreContact, StoreProfile, UserRepository};
