//! # Authorization Module
//!
//! Central capability dispatch for MediMart.
//!
//! Every protected operation names an [`Action`]; handlers build an
//! [`Actor`] from the authenticated user and call [`authorize`] before
//! touching the database. The full role/action matrix lives in one
//! `match` so a permission change is a one-line diff.
//!
//! ## Permission Matrix
//! ```text
//! ┌───────────────────────────┬─────────┬───────┬───────┐
//! │ Action                    │ Patient │ Store │ Admin │
//! ├───────────────────────────┼─────────┼───────┼───────┤
//! │ StockMedicines            │         │   ✓   │       │
//! │ CorrectInventory          │         │   ✓   │       │
//! │ DeactivateInventory       │         │   ✓   │       │
//! │ ViewInventory             │         │   ✓   │       │
//! │ ViewLowStockAlerts        │         │   ✓   │       │
//! │ ViewStoreStats            │         │   ✓   │       │
//! │ ViewStoreProfile          │         │   ✓   │       │
//! │ UpdateStoreProfile        │         │   ✓   │       │
//! │ ResubmitVerification      │         │   ✓   │       │
//! │ AdvanceOrder              │         │   ✓   │       │
//! │ ViewOrderStatistics       │         │   ✓   │       │
//! │ PlaceOrder                │    ✓    │       │       │
//! │ CancelOrder               │    ✓    │       │       │
//! │ ListOrders                │    ✓    │   ✓   │       │
//! │ ReviewStores              │         │       │   ✓   │
//! │ SetVerificationStatus     │         │       │   ✓   │
//! │ OnboardStore              │         │       │   ✓   │
//! └───────────────────────────┴─────────┴───────┴───────┘
//! ```
//!
//! Catalog and store browsing are open to every authenticated user and
//! do not pass through the matrix. Ownership (a store only sees its own
//! shelf, a patient only cancels their own order) is enforced
//! separately, in repository `WHERE` clauses keyed by `Actor::id`.

use crate::error::{CoreError, CoreResult};
use crate::types::UserRole;

/// The authenticated principal performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The user's row id (`users.id`), used for ownership scoping.
    pub id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Everything a MediMart user can ask the system to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Add stock for a medicine (create or merge an inventory entry).
    StockMedicines,
    /// Manually correct price, stock, or restock threshold.
    CorrectInventory,
    /// Deactivate an inventory entry (hide from the marketplace).
    DeactivateInventory,
    /// List the store's own inventory.
    ViewInventory,
    /// List inventory entries at or below their restock threshold.
    ViewLowStockAlerts,
    /// View the store dashboard counters.
    ViewStoreStats,
    /// View the store's own profile, license, and verification state.
    ViewStoreProfile,
    /// Update store name, address, phone, or description.
    UpdateStoreProfile,
    /// Re-submit a rejected store for verification.
    ResubmitVerification,
    /// Move an order forward through the fulfilment pipeline.
    AdvanceOrder,
    /// View per-status order counts and revenue.
    ViewOrderStatistics,
    /// Place an order against a store's inventory.
    PlaceOrder,
    /// Cancel an own, still-open order.
    CancelOrder,
    /// List one's own orders (patient purchases or store sales).
    ListOrders,
    /// List stores, including unverified ones, for review.
    ReviewStores,
    /// Approve or reject a store's verification.
    SetVerificationStatus,
    /// Onboard a store on behalf of another user.
    OnboardStore,
}

impl Action {
    /// Short human-readable name, used in `FORBIDDEN` error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Action::StockMedicines => "stock medicines",
            Action::CorrectInventory => "correct inventory",
            Action::DeactivateInventory => "deactivate inventory",
            Action::ViewInventory => "view inventory",
            Action::ViewLowStockAlerts => "view low stock alerts",
            Action::ViewStoreStats => "view store stats",
            Action::ViewStoreProfile => "view the store profile",
            Action::UpdateStoreProfile => "update the store profile",
            Action::ResubmitVerification => "resubmit verification",
            Action::AdvanceOrder => "advance an order",
            Action::ViewOrderStatistics => "view order statistics",
            Action::PlaceOrder => "place an order",
            Action::CancelOrder => "cancel an order",
            Action::ListOrders => "list orders",
            Action::ReviewStores => "review stores",
            Action::SetVerificationStatus => "set verification status",
            Action::OnboardStore => "onboard stores",
        }
    }
}

/// Checks whether `actor` may perform `action`.
///
/// Returns `CoreError::Forbidden` when the role is not in the matrix
/// row for the action. Never touches I/O.
///
/// ## Example
/// ```rust
/// use medimart_core::{authorize, Action, Actor, UserRole};
///
/// let patient = Actor::new("u-1", UserRole::Patient);
/// assert!(authorize(&patient, Action::PlaceOrder).is_ok());
/// assert!(authorize(&patient, Action::StockMedicines).is_err());
/// ```
pub fn authorize(actor: &Actor, action: Action) -> CoreResult<()> {
    let allowed = match action {
        Action::StockMedicines
        | Action::CorrectInventory
        | Action::DeactivateInventory
        | Action::ViewInventory
        | Action::ViewLowStockAlerts
        | Action::ViewStoreStats
        | Action::ViewStoreProfile
        | Action::UpdateStoreProfile
        | Action::ResubmitVerification
        | Action::AdvanceOrder
        | Action::ViewOrderStatistics => actor.role == UserRole::MedicineStore,

        Action::PlaceOrder | Action::CancelOrder => actor.role == UserRole::Patient,

        Action::ListOrders => {
            matches!(actor.role, UserRole::Patient | UserRole::MedicineStore)
        }

        Action::ReviewStores | Action::SetVerificationStatus | Action::OnboardStore => {
            actor.role == UserRole::Admin
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden {
            role: actor.role,
            action: action.describe(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: UserRole) -> Actor {
        Actor::new("user-1", role)
    }

    #[test]
    fn test_store_actions_require_store_role() {
        let store_actions = [
            Action::StockMedicines,
            Action::CorrectInventory,
            Action::DeactivateInventory,
            Action::ViewInventory,
            Action::ViewLowStockAlerts,
            Action::ViewStoreStats,
            Action::ViewStoreProfile,
            Action::UpdateStoreProfile,
            Action::ResubmitVerification,
            Action::AdvanceOrder,
            Action::ViewOrderStatistics,
        ];

        for action in store_actions {
            assert!(authorize(&actor(UserRole::MedicineStore), action).is_ok());
            assert!(authorize(&actor(UserRole::Patient), action).is_err());
            assert!(authorize(&actor(UserRole::Admin), action).is_err());
            assert!(authorize(&actor(UserRole::Unassigned), action).is_err());
        }
    }

    #[test]
    fn test_patient_actions_require_patient_role() {
        let patient_actions = [Action::PlaceOrder, Action::CancelOrder];

        for action in patient_actions {
            assert!(authorize(&actor(UserRole::Patient), action).is_ok());
            assert!(authorize(&actor(UserRole::MedicineStore), action).is_err());
            assert!(authorize(&actor(UserRole::Admin), action).is_err());
        }
    }

    #[test]
    fn test_stores_never_cancel() {
        // A store moves orders forward; only the patient cancels.
        let store = actor(UserRole::MedicineStore);
        assert!(authorize(&store, Action::AdvanceOrder).is_ok());
        assert!(authorize(&store, Action::CancelOrder).is_err());
    }

    #[test]
    fn test_list_orders_is_shared() {
        assert!(authorize(&actor(UserRole::Patient), Action::ListOrders).is_ok());
        assert!(authorize(&actor(UserRole::MedicineStore), Action::ListOrders).is_ok());
        assert!(authorize(&actor(UserRole::Admin), Action::ListOrders).is_err());
        assert!(authorize(&actor(UserRole::Doctor), Action::ListOrders).is_err());
    }

    #[test]
    fn test_admin_actions() {
        for action in [
            Action::ReviewStores,
            Action::SetVerificationStatus,
            Action::OnboardStore,
        ] {
            assert!(authorize(&actor(UserRole::Admin), action).is_ok());
            assert!(authorize(&actor(UserRole::MedicineStore), action).is_err());
            assert!(authorize(&actor(UserRole::Patient), action).is_err());
        }
    }

    #[test]
    fn test_forbidden_error_names_role_and_action() {
        let err = authorize(&actor(UserRole::Patient), Action::StockMedicines).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PATIENT"));
        assert!(message.contains("stock medicines"));
    }
}
