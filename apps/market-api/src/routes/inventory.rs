//! Store-side shelf management.
//!
//! All routes are scoped to the calling store; an entry id belonging to
//! another store reads as `NOT_FOUND`, never as someone else's data.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use medimart_core::validation::{
    validate_min_stock_level, validate_price_cents, validate_stock, validate_uuid,
};
use medimart_core::{authorize, Action, User};
use medimart_db::{InventoryCorrection, StoreInventoryRow};

use crate::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inventory", get(list_inventory))
        .route("/inventory/alerts", get(low_stock_alerts))
        .route(
            "/inventory/:id",
            axum::routing::patch(correct_entry).delete(deactivate_entry),
        )
}

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorrectionRequest {
    #[serde(default)]
    price_cents: Option<i64>,
    #[serde(default)]
    stock: Option<i64>,
    #[serde(default)]
    min_stock_level: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /inventory` - the calling store's active shelf, newest first.
async fn list_inventory(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<StoreInventoryRow>>> {
    authorize(&user.actor(), Action::ViewInventory)?;

    let rows = state.db.inventory().list_for_store(&user.id).await?;
    Ok(Json(rows))
}

/// `PATCH /inventory/:id` - absolute correction of price, stock, or
/// restock threshold. Omitted fields are left untouched.
async fn correct_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(entry_id): Path<String>,
    Json(body): Json<CorrectionRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&user.actor(), Action::CorrectInventory)?;

    validate_uuid(&entry_id)?;
    if let Some(price) = body.price_cents {
        validate_price_cents(price)?;
    }
    if let Some(stock) = body.stock {
        validate_stock(stock)?;
    }
    if let Some(level) = body.min_stock_level {
        validate_min_stock_level(level)?;
    }

    let changes = InventoryCorrection {
        price_cents: body.price_cents,
        stock: body.stock,
        min_stock_level: body.min_stock_level,
    };

    let entry = state
        .db
        .inventory()
        .correct(&user.id, &entry_id, &changes)
        .await?;
    Ok(Json(json!({ "success": true, "entry": entry })))
}

/// `DELETE /inventory/:id` - hide the entry from the marketplace.
///
/// Refused while open orders still reference the medicine; history is
/// kept either way, the row is only flagged inactive.
async fn deactivate_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(entry_id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&user.actor(), Action::DeactivateInventory)?;

    validate_uuid(&entry_id)?;
    state.db.inventory().deactivate(&user.id, &entry_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /inventory/alerts` - active entries at or below their restock
/// threshold.
async fn low_stock_alerts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<StoreInventoryRow>>> {
    authorize(&user.actor(), Action::ViewLowStockAlerts)?;

    let rows = state.db.inventory().low_stock(&user.id).await?;
    Ok(Json(rows))
}
