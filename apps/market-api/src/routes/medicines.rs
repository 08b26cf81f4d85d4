//! Stocking and the patient-facing catalog.
//!
//! `POST /medicines` is the store-side door: repeat posts for the same
//! medicine merge into the existing shelf entry. `GET /medicines` is
//! the marketplace window: only in-stock entries of verified stores are
//! visible, regardless of who asks.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use medimart_core::validation::{
    effective_limit, normalize_search_query, validate_category, validate_medicine_name,
    validate_min_stock_level, validate_price_cents, validate_stock,
};
use medimart_core::{authorize, Action, User};
use medimart_db::{CatalogFilter, CatalogRow, StockRequest};

use crate::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/medicines", post(add_stock).get(browse_catalog))
}

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddStockRequest {
    medicine_name: String,
    #[serde(default)]
    generic_name: Option<String>,
    category: String,
    #[serde(default)]
    manufacturer: Option<String>,
    #[serde(default)]
    dosage: Option<String>,
    #[serde(default)]
    description: Option<String>,
    price_cents: i64,
    stock: i64,
    #[serde(default)]
    min_stock_level: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogQuery {
    search: Option<String>,
    category: Option<String>,
    store_id: Option<String>,
    limit: Option<u32>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /medicines` - shelve stock, creating or merging the entry.
async fn add_stock(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<AddStockRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    authorize(&user.actor(), Action::StockMedicines)?;

    validate_medicine_name(&body.medicine_name)?;
    validate_category(&body.category)?;
    validate_price_cents(body.price_cents)?;
    validate_stock(body.stock)?;
    if let Some(level) = body.min_stock_level {
        validate_min_stock_level(level)?;
    }

    let request = StockRequest {
        medicine_name: body.medicine_name,
        generic_name: body.generic_name,
        category: body.category,
        manufacturer: body.manufacturer,
        dosage: body.dosage,
        description: body.description,
        price_cents: body.price_cents,
        stock: body.stock,
        min_stock_level: body.min_stock_level,
    };

    let entry = state
        .db
        .inventory()
        .add_or_merge(&user.id, &request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "entry": entry })),
    ))
}

/// `GET /medicines?search=&category=&storeId=&limit=` - browse or
/// search the marketplace catalog.
///
/// A search term shorter than the minimum returns an empty list rather
/// than an error, so type-ahead clients need no special casing.
async fn browse_catalog(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQuery>,
) -> ApiResult<Json<Vec<CatalogRow>>> {
    let search = match params.search.as_deref() {
        None => None,
        Some(raw) => match normalize_search_query(raw)? {
            Some(query) => Some(query),
            None => return Ok(Json(Vec::new())),
        },
    };

    let filter = CatalogFilter {
        search,
        category: params
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        store_id: params.store_id,
        limit: effective_limit(params.limit.or(Some(state.search_limit))),
    };

    let rows = state.db.inventory().search_catalog(&filter).await?;
    Ok(Json(rows))
}
