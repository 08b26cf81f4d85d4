//! # MediMart Market API
//!
//! REST surface for the medicine marketplace.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          medimart-api                                   │
//! │                                                                         │
//! │  Request ──► TraceLayer ──► require_user ──► handler                   │
//! │                              (bearer JWT,     │                         │
//! │                               user lookup)    ├─► authorize(actor, ..)  │
//! │                                               ├─► validate input       │
//! │                                               └─► repository call      │
//! │                                                                         │
//! │  routes/stores     onboarding, profile, public directory               │
//! │  routes/admin      verification review                                 │
//! │  routes/medicines  stocking + catalog browse/search                    │
//! │  routes/inventory  shelf management, low-stock alerts                  │
//! │  routes/orders     order lifecycle + statistics                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never touch SQL and never re-implement business rules; they
//! translate HTTP to repository calls and domain errors back to the
//! JSON envelope in [`error`].

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use medimart_core::TransitionPolicy;
use medimart_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// Shared state handed to middleware and handlers.
pub struct AppState {
    /// Storage handle. Cheap to clone; repositories share the pool.
    pub db: Database,

    /// Bearer token verifier.
    pub jwt: JwtManager,

    /// Transition policy applied to store-side order fulfillment.
    pub policy: TransitionPolicy,

    /// Catalog page size used when the client sends no `limit`.
    pub search_limit: u32,
}

impl AppState {
    /// Assembles shared state from a database handle and configuration.
    pub fn new(db: Database, config: &ApiConfig) -> Arc<Self> {
        Arc::new(AppState {
            jwt: JwtManager::new(config.jwt_secret.clone()),
            policy: config.transition_policy(),
            search_limit: config.search_limit,
            db,
        })
    }
}

/// Builds the full application router against the given state.
pub fn build_app(state: Arc<AppState>) -> axum::Router {
    routes::router(state)
}
