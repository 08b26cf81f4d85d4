//! # Domain Types
//!
//! Core domain types used throughout MediMart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Medicine     │   │ InventoryEntry  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  auth_id        │   │  name           │   │  store_id (FK)  │       │
//! │  │  role           │   │  category       │   │  medicine_id    │       │
//! │  │  store profile  │   │  generic_name   │   │  price_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   │  stock          │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │   OrderStatus   │   │    UserRole     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  quantity       │   │  Pending        │   │  Patient        │       │
//! │  │  unit_price     │   │  ...            │   │  MedicineStore  │       │
//! │  │  total_cents    │   │  Delivered      │   │  Admin          │       │
//! │  │  status         │   │  Cancelled      │   │  ...            │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Every entity has an `id`: UUID v4, immutable, used for relations.
//! Users additionally carry `auth_id`, the subject the external identity
//! provider knows them by. Medicines carry a business identity of
//! `(name, category)` which is looked up or created idempotently.
//!
//! ## Snapshot Pattern
//! An [`Order`] freezes `unit_price_cents` at placement time. Later price
//! changes on the inventory entry never alter historical orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// User Role
// =============================================================================

/// The role a user account holds on the platform.
///
/// Accounts start as `Unassigned` and take a role during onboarding.
/// Role determines which operations the account may perform; see
/// [`crate::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Fresh account, no role chosen yet.
    Unassigned,
    /// Orders medicines from verified stores.
    Patient,
    /// Stocks medicines and fulfills orders.
    MedicineStore,
    /// Reviews store verification requests.
    Admin,
    /// Consultation side of the platform; no inventory/order rights.
    Doctor,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Unassigned
    }
}

// =============================================================================
// Store Verification Status
// =============================================================================

/// Admin-controlled gate determining whether a store is visible to patients.
///
/// Only `Verified` stores appear in patient browse/search and can take
/// orders. Stores enter `Pending` on onboarding and may resubmit after a
/// rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Not a store, or verification never requested.
    Unset,
    /// Submitted, awaiting admin review.
    Pending,
    /// Approved; store is live.
    Verified,
    /// Declined; store may resubmit.
    Rejected,
}

impl VerificationStatus {
    /// All statuses, in review order.
    pub const ALL: [VerificationStatus; 4] = [
        VerificationStatus::Unset,
        VerificationStatus::Pending,
        VerificationStatus::Verified,
        VerificationStatus::Rejected,
    ];

    /// The stable wire name of this status (e.g. `PENDING`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unset => "UNSET",
            VerificationStatus::Pending => "PENDING",
            VerificationStatus::Verified => "VERIFIED",
            VerificationStatus::Rejected => "REJECTED",
        }
    }
}

impl Default for VerificationStatus {
    fn default() -> Self {
        VerificationStatus::Unset
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    /// Parses the wire name. The error carries the rejected input so the
    /// API layer can report it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerificationStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a medicine order.
///
/// ## State Machine
/// ```text
/// PENDING ──► CONFIRMED ──► PREPARING ──► READY_FOR_PICKUP ──► DELIVERED
///    │            │             │                │
///    └────────────┴─────────────┴────────────────┴──► CANCELLED
/// ```
/// `DELIVERED` and `CANCELLED` are terminal. Fulfillment moves strictly
/// forward; `CANCELLED` branches off from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed by the patient, not yet acknowledged by the store.
    Pending,
    /// Store has accepted the order.
    Confirmed,
    /// Store is assembling the order.
    Preparing,
    /// Ready for the patient to collect.
    ReadyForPickup,
    /// Handed over; `delivery_date` is stamped on this transition.
    Delivered,
    /// Abandoned by the patient before delivery.
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in fulfillment order with `Cancelled` last.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::ReadyForPickup,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses that block inventory deactivation and count as "open"
    /// in store dashboards.
    pub const OPEN: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
    ];

    /// Whether no further transitions are permitted from this status.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the order still demands store-side work.
    #[inline]
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing
        )
    }

    /// Position in the forward fulfillment sequence.
    ///
    /// `Cancelled` sits outside the sequence and has no position.
    pub const fn sequence_index(&self) -> Option<usize> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Preparing => Some(2),
            OrderStatus::ReadyForPickup => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    /// The stable wire name of this status (e.g. `READY_FOR_PICKUP`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::ReadyForPickup => "READY_FOR_PICKUP",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    /// Parses the wire name. The error carries the rejected input so the
    /// API layer can report it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// =============================================================================
// Transition Policy
// =============================================================================

/// How strictly store-side fulfillment must follow the status sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Forward jumps are allowed (`PENDING → READY_FOR_PICKUP` is legal).
    /// Backward moves never are.
    ForwardSkipping,
    /// Only single-step advancement (`PENDING → CONFIRMED → ...`).
    Strict,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        TransitionPolicy::ForwardSkipping
    }
}

/// Validates one order status transition for a given actor role.
///
/// ## Transition Rights
/// | role | allowed targets |
/// |---|---|
/// | `Patient` | `Cancelled` only, from any non-terminal status |
/// | `MedicineStore` | `Confirmed`, `Preparing`, `ReadyForPickup`, `Delivered`; never `Cancelled` |
/// | anyone else | nothing |
///
/// Store moves must advance the fulfillment sequence. Under
/// [`TransitionPolicy::ForwardSkipping`] any forward jump is accepted;
/// under [`TransitionPolicy::Strict`] only the immediate next status is.
///
/// ## Errors
/// - [`CoreError::OrderNotCancellable`] - patient cancel on a terminal order
/// - [`CoreError::InvalidTransition`] - every other rejected combination
pub fn validate_transition(
    role: UserRole,
    current: OrderStatus,
    target: OrderStatus,
    policy: TransitionPolicy,
) -> CoreResult<()> {
    match role {
        UserRole::Patient => {
            if target != OrderStatus::Cancelled {
                return Err(CoreError::InvalidTransition {
                    from: current,
                    to: target,
                    role,
                });
            }
            if current.is_terminal() {
                return Err(CoreError::OrderNotCancellable { status: current });
            }
            Ok(())
        }
        UserRole::MedicineStore => {
            // Stores never cancel; that right belongs to the patient.
            let (Some(from_idx), Some(to_idx)) =
                (current.sequence_index(), target.sequence_index())
            else {
                return Err(CoreError::InvalidTransition {
                    from: current,
                    to: target,
                    role,
                });
            };

            if target == OrderStatus::Pending || current.is_terminal() {
                return Err(CoreError::InvalidTransition {
                    from: current,
                    to: target,
                    role,
                });
            }

            let allowed = match policy {
                TransitionPolicy::ForwardSkipping => to_idx > from_idx,
                TransitionPolicy::Strict => to_idx == from_idx + 1,
            };

            if !allowed {
                return Err(CoreError::InvalidTransition {
                    from: current,
                    to: target,
                    role,
                });
            }
            Ok(())
        }
        _ => Err(CoreError::InvalidTransition {
            from: current,
            to: target,
            role,
        }),
    }
}

// =============================================================================
// User
// =============================================================================

/// A platform account. Stores are users with `role = MedicineStore` plus
/// the profile fields filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Subject the external identity provider knows this account by.
    pub auth_id: String,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Platform role.
    pub role: UserRole,

    /// Pharmacy display name (stores only).
    pub store_name: Option<String>,

    /// Physical address (stores only).
    pub store_address: Option<String>,

    /// Contact phone (stores only).
    pub store_phone: Option<String>,

    /// Pharmacy license number, immutable after onboarding (stores only).
    pub store_license: Option<String>,

    /// Free-text description (stores only).
    pub store_description: Option<String>,

    /// Admin-controlled visibility gate.
    pub store_verification_status: VerificationStatus,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this account is a store visible to patients.
    #[inline]
    pub fn is_verified_store(&self) -> bool {
        self.role == UserRole::MedicineStore
            && self.store_verification_status == VerificationStatus::Verified
    }

    /// The actor identity of this user, for permission checks.
    #[inline]
    pub fn actor(&self) -> crate::authorize::Actor {
        crate::authorize::Actor {
            id: self.id.clone(),
            role: self.role,
        }
    }
}

/// Public projection of a verified store for patient browsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoreSummary {
    pub id: String,
    pub name: String,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    pub store_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Medicine
// =============================================================================

/// A catalog entry. Identity is `(name, category)`; the first store to
/// stock a medicine creates it, later stocking calls reuse it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Medicine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (e.g. "Paracetamol 500mg").
    pub name: String,

    /// Pharmacological name, if distinct from the display name.
    pub generic_name: Option<String>,

    /// Catalog category (e.g. "Analgesics").
    pub category: String,

    /// Producing company.
    pub manufacturer: Option<String>,

    /// Dosage description (e.g. "500mg").
    pub dosage: Option<String>,

    /// Free-text description.
    pub description: Option<String>,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Inventory Entry
// =============================================================================

/// A per-store stocking record binding one medicine to one store.
/// Unique per `(store_id, medicine_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning store.
    pub store_id: String,

    /// Stocked medicine.
    pub medicine_id: String,

    /// Current price in cents. Always positive.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Restock threshold; entries at or below it appear in low-stock
    /// alerts. Unset means the store opted out of alerts for this item.
    pub min_stock_level: Option<i64>,

    /// Soft-delete flag. Inactive entries are kept for order history but
    /// excluded from browse/search/order paths.
    pub is_active: bool,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

impl InventoryEntry {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether this entry should appear in low-stock alerts.
    pub fn is_low_stock(&self) -> bool {
        match self.min_stock_level {
            Some(min) => self.is_active && self.stock <= min,
            None => false,
        }
    }

    /// Whether a patient could order `quantity` units right now.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.is_active && quantity > 0 && self.stock >= quantity
    }
}

// =============================================================================
// Order
// =============================================================================

/// One line-item purchase of a medicine from a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Buying patient.
    pub patient_id: String,

    /// Selling store.
    pub store_id: String,

    /// Ordered medicine.
    pub medicine_id: String,

    /// Units ordered. Always positive.
    pub quantity: i64,

    /// Price per unit in cents, frozen at placement time.
    pub unit_price_cents: i64,

    /// `unit_price_cents × quantity`, frozen at placement time.
    pub total_cents: i64,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// Free-text note from patient or store.
    pub notes: Option<String>,

    /// When the order was placed.
    pub order_date: DateTime<Utc>,

    /// Stamped when the order reaches `Delivered`.
    pub delivery_date: Option<DateTime<Utc>>,

    /// When the row was created.
    pub created_at: DateTime<Utc>,

    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the frozen total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Aggregates (read models)
// =============================================================================

/// Count of a store's orders in one status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Order statistics for one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    /// Orders grouped by status. Statuses with zero orders are omitted.
    pub status_counts: Vec<StatusCount>,
    /// Sum of `total_cents` over delivered orders.
    pub total_revenue_cents: i64,
    /// Orders placed in the trailing 30 days.
    pub recent_orders: i64,
}

/// Store dashboard aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Active inventory entries.
    pub total_medicines: i64,
    /// All orders ever taken.
    pub total_orders: i64,
    /// Orders still in `PENDING`, `CONFIRMED` or `PREPARING`.
    pub pending_orders: i64,
    /// Revenue over delivered orders, in cents.
    pub total_revenue_cents: i64,
    /// Active entries at or below their restock threshold.
    pub low_stock_items: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
