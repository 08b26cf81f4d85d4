//! Store verification review. Admin only.
//!
//! ```text
//! PENDING ──approve──► VERIFIED ──► visible in catalog + directory
//!    │
//!    └─────reject────► REJECTED ──► store may resubmit
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use medimart_core::validation::{validate_store_profile, validate_uuid};
use medimart_core::{authorize, Action, User, VerificationStatus};
use medimart_db::StoreProfile;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/admin/stores",
            get(review_stores).post(onboard_store_for_user),
        )
        .route("/admin/stores/:id/verification", put(set_verification))
}

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
struct ReviewQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminOnboardRequest {
    user_id: String,
    store_name: String,
    store_address: String,
    store_phone: String,
    store_license: String,
    #[serde(default)]
    store_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerificationRequest {
    status: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /admin/stores?status=` - stores for review, optionally filtered
/// by verification status.
async fn review_stores(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(params): Query<ReviewQuery>,
) -> ApiResult<Json<Vec<User>>> {
    authorize(&user.actor(), Action::ReviewStores)?;

    let status = match params.status.as_deref() {
        Some(raw) => Some(
            raw.parse::<VerificationStatus>()
                .map_err(ApiError::InvalidStatus)?,
        ),
        None => None,
    };

    let stores = state.db.users().list_stores(status).await?;
    Ok(Json(stores))
}

/// `POST /admin/stores` - onboard a store on behalf of a target user.
///
/// Same rules as self-service onboarding: the target must still be
/// `UNASSIGNED` and verification starts `PENDING`.
async fn onboard_store_for_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<AdminOnboardRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&user.actor(), Action::OnboardStore)?;

    validate_uuid(&body.user_id)?;
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

    let store = state
        .db
        .users()
        .onboard_store(&body.user_id, &profile)
        .await?;
    Ok(Json(json!({ "success": true, "store": store })))
}

/// `PUT /admin/stores/:id/verification` - record a review decision.
async fn set_verification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(store_id): Path<String>,
    Json(body): Json<VerificationRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&user.actor(), Action::SetVerificationStatus)?;

    validate_uuid(&store_id)?;
    let status = body
        .status
        .parse::<VerificationStatus>()
        .map_err(ApiError::InvalidStatus)?;

    let store = state.db.users().set_verification(&store_id, status).await?;
    Ok(Json(json!({ "success": true, "store": store })))
}
