//! # medimart-core: Pure Domain Logic for MediMart
//!
//! This crate is the **heart** of the MediMart pharmacy marketplace. It
//! contains the order and inventory rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MediMart Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/market-api (Axum)                         │   │
//! │  │    POST /medicines ──► POST /orders ──► PUT /orders/{id}        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ medimart-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ authorize │  │ validation│  │   │
//! │  │   │  Order    │  │   Money   │  │   Actor   │  │   rules   │  │   │
//! │  │   │ Inventory │  │  (cents)  │  │  Action   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  medimart-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Medicine, InventoryEntry, Order) and
//!   the order status state machine
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`authorize`] - Role-based permission rules (`Actor`, `Action`)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use medimart_core::money::Money;
//! use medimart_core::types::{OrderStatus, TransitionPolicy, UserRole};
//! use medimart_core::validate_transition;
//!
//! // Snapshot a unit price and compute an order total (never floats!)
//! let unit_price = Money::from_cents(500); // 5.00
//! let total = unit_price.multiply_quantity(10);
//! assert_eq!(total.cents(), 5000); // 50.00
//!
//! // A store may confirm a pending order...
//! assert!(validate_transition(
//!     UserRole::MedicineStore,
//!     OrderStatus::Pending,
//!     OrderStatus::Confirmed,
//!     TransitionPolicy::ForwardSkipping,
//! )
//! .is_ok());
//!
//! // ...but may never cancel one.
//! assert!(validate_transition(
//!     UserRole::MedicineStore,
//!     OrderStatus::Pending,
//!     OrderStatus::Cancelled,
//!     TransitionPolicy::ForwardSkipping,
//! )
//! .is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod authorize;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use medimart_core::Money` instead of
// `use medimart_core::money::Money`

pub use authorize::{authorize, Action, Actor};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single medicine per order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
/// and keeps a single order within a fulfillable size.
pub const MAX_ORDER_QUANTITY: i64 = 999;

/// Minimum length of a catalog search query.
///
/// Queries shorter than this return an empty result set instead of
/// scanning the whole catalog for one-letter matches.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Default number of results returned by catalog search/browse.
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// Maximum number of results a single search/browse call may request.
pub const MAX_SEARCH_LIMIT: u32 = 200;

/// Window used by the "recent orders" statistic, in days.
pub const RECENT_ORDERS_WINDOW_DAYS: i64 = 30;
