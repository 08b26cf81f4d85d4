//! Liveness probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::AppState;

/// `GET /health` - process liveness plus database reachability.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    if state.db.health_check().await {
        Json(json!({ "status": "ok", "database": true })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": false })),
        )
            .into_response()
    }
}
