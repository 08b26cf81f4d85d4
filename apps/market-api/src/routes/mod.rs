//! Route table assembly.
//!
//! Every route except `/health` sits behind the bearer-token middleware
//! in [`crate::auth`]. Role gates live in the individual handlers, next
//! to the operations they protect.

pub mod admin;
pub mod health;
pub mod inventory;
pub mod medicines;
pub mod orders;
pub mod stores;

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::require_user;
use crate::AppState;

/// Assembles the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(stores::router())
        .merge(admin::router())
        .merge(medicines::router())
        .merge(inventory::router())
        .merge(orders::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/health", get(health::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
