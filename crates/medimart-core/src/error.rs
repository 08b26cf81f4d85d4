//! # Error Types
//!
//! Domain-specific error types for medimart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medimart-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medimart-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - What HTTP clients see (stable codes)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (medicine name, status, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to one stable, user-facing error code

use thiserror::Error;

use crate::types::{OrderStatus, UserRole};

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
///
/// These errors represent business rule failures. The HTTP layer
/// translates each variant to a stable error code so callers can branch
/// on them without parsing text.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity exceeds what the store has on hand.
    ///
    /// ## When This Occurs
    /// - Order placement against an entry with too little stock
    /// - A concurrent order took the remaining units first
    ///
    /// ## User Workflow
    /// ```text
    /// Place order (qty: 10)
    ///      │
    ///      ▼
    /// Conditional decrement: stock >= 10?
    ///      │
    ///      ▼
    /// InsufficientStock { medicine: "Paracetamol 500mg", available: 3, requested: 10 }
    ///      │
    ///      ▼
    /// Client shows: "Insufficient stock available"
    /// ```
    #[error("Insufficient stock available for {medicine}: {available} left, requested {requested}")]
    InsufficientStock {
        medicine: String,
        available: i64,
        requested: i64,
    },

    /// The role/state combination does not permit this status change.
    ///
    /// ## When This Occurs
    /// - Store attempting `CANCELLED`
    /// - Patient attempting anything but `CANCELLED`
    /// - Backward or repeated fulfillment moves
    /// - Stage skipping under the strict transition policy
    #[error("Invalid status transition {from} -> {to} for role {role:?}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
        role: UserRole,
    },

    /// Patient tried to cancel an order that already reached a terminal
    /// status.
    #[error("Order cannot be cancelled at this stage ({status})")]
    OrderNotCancellable { status: OrderStatus },

    /// Deactivation blocked: open orders still reference the entry.
    #[error("Cannot remove medicine with pending orders ({count} open)")]
    PendingOrdersExist { count: i64 },

    /// Onboarding attempted on an account that already holds a role.
    #[error("User already has a role assigned ({role:?})")]
    RoleAlreadyAssigned { role: UserRole },

    /// Verification resubmission on an already verified store.
    #[error("Store is already verified")]
    StoreAlreadyVerified,

    /// Verification resubmission while a review is in flight.
    #[error("Verification is already pending review")]
    VerificationAlreadyPending,

    /// Actor's role does not grant this operation.
    #[error("Role {role:?} may not {action}")]
    Forbidden {
        role: UserRole,
        action: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation before domain logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    CannotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, malformed phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            medicine: "Paracetamol 500mg".to_string(),
            available: 3,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock available for Paracetamol 500mg: 3 left, requested 10"
        );

        let err = CoreError::OrderNotCancellable {
            status: OrderStatus::Delivered,
        };
        assert_eq!(
            err.to_string(),
            "Order cannot be cancelled at this stage (DELIVERED)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "medicineName".to_string(),
        };
        assert_eq!(err.to_string(), "medicineName is required");

        let err = ValidationError::MustBePositive {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "category".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
