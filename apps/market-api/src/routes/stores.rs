//! Onboarding, store profile management, and the public store directory.
//!
//! ## Onboarding
//! ```text
//! UNASSIGNED ──POST /patients──► PATIENT
//!     │
//!     └──────POST /stores─────► MEDICINE_STORE (verification PENDING)
//! ```
//! Role adoption is one-way; a second onboarding call returns
//! `ROLE_ALREADY_ASSIGNED`.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use medimart_core::validation::{validate_store_contact, validate_store_profile};
use medimart_core::{authorize, Action, StoreStats, StoreSummary, User};
use medimart_db::{StoreContact, StoreProfile};

use crate::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/patients", post(onboard_patient))
        .route("/stores", post(onboard_store).get(list_stores))
        .route("/stores/me", get(store_profile).put(update_store_profile))
        .route("/stores/me/stats", get(store_stats))
        .route("/stores/me/verification", post(resubmit_verification))
}

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreProfileRequest {
    store_name: String,
    store_address: String,
    store_phone: String,
    store_license: String,
    #[serde(default)]
    store_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreContactRequest {
    store_name: String,
    store_address: String,
    store_phone: String,
    #[serde(default)]
    store_description: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /patients` - adopt the patient role.
///
/// No capability gate: the only requirement is that the caller has not
/// picked a role yet, which the conditional update enforces.
async fn onboard_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Value>> {
    let user = state.db.users().onboard_patient(&user.id).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// `POST /stores` - adopt the store role. Verification starts `PENDING`.
async fn onboard_store(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<StoreProfileRequest>,
) -> ApiResult<Json<Value>> {
    validate_store_profile(
        &body.store_name,
        &body.store_address,
        &body.store_phone,
        &body.store_license,
        body.store_description.as_deref(),
    )?;

    let profile = StoreProfile {
        store_name: body.store_name,
        store_address: body.store_address,
        store_phone: body.store_phone,
        store_license: body.store_license,
        store_description: body.store_description,
    };

    let store = state.db.users().onboard_store(&user.id, &profile).await?;
    Ok(Json(json!({ "success": true, "store": store })))
}

/// `GET /stores` - public directory of verified stores.
async fn list_stores(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<StoreSummary>>> {
    let stores = state.db.users().list_verified_stores().await?;
    Ok(Json(stores))
}

/// `GET /stores/me` - the calling store's own profile.
async fn store_profile(Extension(user): Extension<User>) -> ApiResult<Json<User>> {
    authorize(&user.actor(), Action::ViewStoreProfile)?;
    Ok(Json(user))
}

/// `PUT /stores/me` - update contact fields. The license is immutable.
async fn update_store_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<StoreContactRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&user.actor(), Action::UpdateStoreProfile)?;

    validate_store_contact(
        &body.store_name,
        &body.store_address,
        &body.store_phone,
        body.store_description.as_deref(),
    )?;

    let contact = StoreContact {
        store_name: body.store_name,
        store_address: body.store_address,
        store_phone: body.store_phone,
        store_description: body.store_description,
    };

    let store = state
        .db
        .users()
        .update_store_profile(&user.id, &contact)
        .await?;
    Ok(Json(json!({ "success": true, "store": store })))
}

/// `GET /stores/me/stats` - dashboard counters for the calling store.
async fn store_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<StoreStats>> {
    authorize(&user.actor(), Action::ViewStoreStats)?;

    let inventory = state.db.inventory();
    let orders = state.db.orders();

    let stats = StoreStats {
        total_medicines: inventory.count_active(&user.id).await?,
        total_orders: orders.count_for_store(&user.id).await?,
        pending_orders: orders.count_open_for_store(&user.id).await?,
        total_revenue_cents: orders.delivered_revenue(&user.id).await?,
        low_stock_items: inventory.count_low_stock(&user.id).await?,
    };

    Ok(Json(stats))
}

/// `POST /stores/me/verification` - re-enter the review queue after a
/// rejection.
async fn resubmit_verification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Value>> {
    authorize(&user.actor(), Action::ResubmitVerification)?;

    let store = state.db.users().resubmit_verification(&user.id).await?;
    Ok(Json(json!({ "success": true, "store": store })))
}
