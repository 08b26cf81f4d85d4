//! Order lifecycle: placement, fulfillment, cancellation, statistics.
//!
//! ## Who Moves an Order
//! ```text
//! patient  POST /orders            place (stock reserved atomically)
//! store    PUT  /orders/:id        PENDING → ... → DELIVERED
//! patient  PUT  /orders/:id        status CANCELLED only
//! patient  DELETE /orders/:id      same as PUT with CANCELLED
//! ```
//! The `PUT` handler dispatches on the requested status: `CANCELLED`
//! runs the patient cancellation path, anything else the store
//! fulfillment path. Each path carries its own role gate, so a store
//! asking for `CANCELLED` or a patient asking for `CONFIRMED` is
//! refused before any state is touched.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use medimart_core::validation::{validate_notes, validate_quantity, validate_uuid};
use medimart_core::{authorize, Action, OrderStatistics, OrderStatus, User, UserRole};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(place_order).get(list_orders))
        .route("/orders/stats", get(order_statistics))
        .route("/orders/:id", put(update_order).delete(cancel_order))
}

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOrderRequest {
    inventory_id: String,
    quantity: i64,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateOrderRequest {
    status: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrdersQuery {
    status: Option<String>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<OrderStatus>, ApiError> {
    match raw {
        Some(value) => value
            .parse::<OrderStatus>()
            .map(Some)
            .map_err(ApiError::InvalidStatus),
        None => Ok(None),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /orders` - place an order against an inventory entry.
///
/// The unit price is frozen into the order and stock is reserved in
/// the same transaction, so a later price correction never reprices an
/// existing order.
async fn place_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    authorize(&user.actor(), Action::PlaceOrder)?;

    validate_uuid(&body.inventory_id)?;
    validate_quantity(body.quantity)?;
    if let Some(notes) = body.notes.as_deref() {
        validate_notes(notes)?;
    }

    let order = state
        .db
        .orders()
        .place(&user.id, &body.inventory_id, body.quantity, body.notes.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "order": order })),
    ))
}

/// `GET /orders?status=` - the caller's own orders, newest first.
///
/// Patients see their purchases, stores their sales; the same route
/// serves both shapes.
async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(params): Query<OrdersQuery>,
) -> ApiResult<Response> {
    authorize(&user.actor(), Action::ListOrders)?;

    let status = parse_status_filter(params.status.as_deref())?;
    let orders = state.db.orders();

    let response = if user.role == UserRole::Patient {
        Json(orders.list_for_patient(&user.id, status).await?).into_response()
    } else {
        Json(orders.list_for_store(&user.id, status).await?).into_response()
    };

    Ok(response)
}

/// `PUT /orders/:id` - move an order to a new status.
async fn update_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(order_id): Path<String>,
    Json(body): Json<UpdateOrderRequest>,
) -> ApiResult<Json<Value>> {
    validate_uuid(&order_id)?;
    let target = body
        .status
        .parse::<OrderStatus>()
        .map_err(ApiError::InvalidStatus)?;
    if let Some(notes) = body.notes.as_deref() {
        validate_notes(notes)?;
    }

    let actor = user.actor();
    let orders = state.db.orders();

    let order = if target == OrderStatus::Cancelled {
        authorize(&actor, Action::CancelOrder)?;
        orders.cancel(&user.id, &order_id, state.policy).await?
    } else {
        authorize(&actor, Action::AdvanceOrder)?;
        orders
            .advance(
                &user.id,
                &order_id,
                target,
                state.policy,
                body.notes.as_deref(),
            )
            .await?
    };

    Ok(Json(json!({ "success": true, "order": order })))
}

/// `DELETE /orders/:id` - cancel an own, still-open order.
///
/// Reserved stock goes back on the shelf in the same transaction.
async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&user.actor(), Action::CancelOrder)?;

    validate_uuid(&order_id)?;
    let order = state
        .db
        .orders()
        .cancel(&user.id, &order_id, state.policy)
        .await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

/// `GET /orders/stats` - per-status counts, revenue, and recent volume
/// for the calling store.
async fn order_statistics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<OrderStatistics>> {
    authorize(&user.actor(), Action::ViewOrderStatistics)?;

    let stats = state.db.orders().statistics(&user.id).await?;
    Ok(Json(stats))
}
