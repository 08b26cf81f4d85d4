//! # API Error Envelope
//!
//! Translates domain and storage errors into HTTP responses.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Error Translation                                │
//! │                                                                         │
//! │  ValidationError ──► 400  MISSING_FIELD / MUST_BE_POSITIVE / ...        │
//! │  CoreError ────────► 403  FORBIDDEN                                     │
//! │                      409  INSUFFICIENT_STOCK / INVALID_TRANSITION / ... │
//! │  DbError ──────────► 404  NOT_FOUND                                     │
//! │                      500  DATABASE_ERROR                                │
//! │                                                                         │
//! │  Every response body: {"error": CODE, "message": "..."}                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Codes are stable; clients branch on `error`, humans read `message`.
//! Server-side failures log the cause and return a generic message so
//! internals never leak onto the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medimart_core::{CoreError, ValidationError};
use medimart_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Convenience type alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a request can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, or expired bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Request input failed validation before reaching the domain.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A status value in the path, query, or body is not a known name.
    #[error("Unrecognized status value: {0}")]
    InvalidStatus(String),

    /// A business rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Storage-layer failure that is not a domain rule.
    #[error(transparent)]
    Db(DbError),

    /// Unexpected server-side failure.
    #[error("{0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    /// Unwraps domain rules that surfaced through the storage layer so
    /// they map to their own codes instead of `DATABASE_ERROR`.
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => ApiError::Domain(core),
            other => ApiError::Db(other),
        }
    }
}

impl ApiError {
    /// The HTTP status and stable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, validation_code(err)),
            ApiError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "INVALID_STATUS"),
            ApiError::Domain(err) => domain_status_and_code(err),
            ApiError::Db(DbError::NotFound { .. }) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Db(DbError::UniqueViolation { .. }) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

fn domain_status_and_code(err: &CoreError) -> (StatusCode, &'static str) {
    match err {
        CoreError::InsufficientStock { .. } => (StatusCode::CONFLICT, "INSUFFICIENT_STOCK"),
        CoreError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
        CoreError::OrderNotCancellable { .. } => (StatusCode::CONFLICT, "ORDER_NOT_CANCELLABLE"),
        CoreError::PendingOrdersExist { .. } => (StatusCode::CONFLICT, "PENDING_ORDERS_EXIST"),
        CoreError::RoleAlreadyAssigned { .. } => (StatusCode::CONFLICT, "ROLE_ALREADY_ASSIGNED"),
        CoreError::StoreAlreadyVerified => (StatusCode::CONFLICT, "STORE_ALREADY_VERIFIED"),
        CoreError::VerificationAlreadyPending => {
            (StatusCode::CONFLICT, "VERIFICATION_ALREADY_PENDING")
        }
        CoreError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        CoreError::Validation(err) => (StatusCode::BAD_REQUEST, validation_code(err)),
    }
}

fn validation_code(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::Required { .. } => "MISSING_FIELD",
        ValidationError::MustBePositive { .. } => "MUST_BE_POSITIVE",
        ValidationError::CannotBeNegative { .. } => "CANNOT_BE_NEGATIVE",
        _ => "VALIDATION_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "An unexpected error occurred".to_string()
        } else {
            debug!(code, error = %self, "Request rejected");
            self.to_string()
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use medimart_core::{OrderStatus, UserRole};

    #[test]
    fn test_validation_errors_map_to_400_with_specific_codes() {
        let err = ApiError::Validation(ValidationError::Required {
            field: "medicineName".to_string(),
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "MISSING_FIELD")
        );

        let err = ApiError::Validation(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "MUST_BE_POSITIVE")
        );

        let err = ApiError::Validation(ValidationError::TooShort {
            field: "storeName".to_string(),
            min: 2,
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
    }

    #[test]
    fn test_domain_conflicts_map_to_409() {
        let err = ApiError::Domain(CoreError::InsufficientStock {
            medicine: "Paracetamol 500mg".to_string(),
            available: 3,
            requested: 10,
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::CONFLICT, "INSUFFICIENT_STOCK")
        );

        let err = ApiError::Domain(CoreError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Confirmed,
            role: UserRole::MedicineStore,
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::CONFLICT, "INVALID_TRANSITION")
        );
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err = ApiError::Domain(CoreError::Forbidden {
            role: UserRole::Patient,
            action: "stock medicines",
        });
        assert_eq!(err.status_and_code(), (StatusCode::FORBIDDEN, "FORBIDDEN"));
    }

    #[test]
    fn test_db_errors_unwrap_domain_rules() {
        let db_err = DbError::Domain(CoreError::StoreAlreadyVerified);
        let api_err = ApiError::from(db_err);
        assert_eq!(
            api_err.status_and_code(),
            (StatusCode::CONFLICT, "STORE_ALREADY_VERIFIED")
        );

        let api_err = ApiError::from(DbError::not_found("Order", "o-404"));
        assert_eq!(
            api_err.status_and_code(),
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        );
    }
}
