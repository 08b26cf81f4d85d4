//! # Order Repository
//!
//! Database operations for order placement, fulfillment, and history.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Lifecycle                                    │
//! │                                                                         │
//! │  PENDING ──► CONFIRMED ──► PREPARING ──► READY_FOR_PICKUP ──► DELIVERED │
//! │     │            │             │                │                       │
//! │     └────────────┴─────────────┴────────────────┘                       │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                     CANCELLED  (patient only; stock returns)            │
//! │                                                                         │
//! │  Stores move orders forward. Patients may only cancel, and only         │
//! │  before a terminal status. Placement and cancellation adjust stock      │
//! │  inside the same transaction as the order write.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are frozen at placement: `unit_price_cents` and `total_cents`
//! never change afterwards, whatever the shelf price does.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use medimart_core::{
    validate_transition, CoreError, Money, Order, OrderStatistics, OrderStatus, StatusCount,
    TransitionPolicy, UserRole, VerificationStatus, RECENT_ORDERS_WINDOW_DAYS,
};

// =============================================================================
// Rows
// =============================================================================

/// One line in a patient's order history, joined with medicine and
/// store display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PatientOrderRow {
    pub id: String,
    pub store_id: String,
    pub medicine_id: String,
    pub medicine_name: String,
    pub dosage: Option<String>,
    pub store_name: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
}

/// One line in a store's fulfillment queue, joined with medicine and
/// buyer display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreOrderRow {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub medicine_id: String,
    pub medicine_name: String,
    pub dosage: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
}

/// The marketplace listing an order targets, as seen inside the
/// placement transaction.
#[derive(Debug, sqlx::FromRow)]
struct PlacementTarget {
    store_id: String,
    medicine_id: String,
    price_cents: i64,
    stock: i64,
    is_active: bool,
    medicine_name: String,
    store_verification_status: VerificationStatus,
}

const ORDER_COLUMNS: &str = r#"
    id, patient_id, store_id, medicine_id, quantity, unit_price_cents,
    total_cents, status, notes, order_date, delivery_date,
    created_at, updated_at
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = OrderRepository::new(pool);
///
/// let order = repo.place(&patient.id, &entry_id, 2, None).await?;
/// let order = repo.advance(&store.id, &order.id, OrderStatus::Confirmed, policy, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order against one inventory entry.
    ///
    /// Runs as a single transaction:
    /// 1. resolve the listing (must be active, in a `VERIFIED` store)
    /// 2. conditionally decrement stock (`stock >= quantity` in the WHERE)
    /// 3. insert the order with the price frozen at today's shelf price
    ///
    /// A listing that is inactive or whose store is not verified reads
    /// as absent, the same way the catalog hides it.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] - no such purchasable listing
    /// - `Domain(InsufficientStock)` - the conditional decrement matched
    ///   zero rows
    pub async fn place(
        &self,
        patient_id: &str,
        entry_id: &str,
        quantity: i64,
        notes: Option<&str>,
    ) -> DbResult<Order> {
        debug!(patient_id = %patient_id, entry_id = %entry_id, quantity, "Placing order");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let target = sqlx::query_as::<_, PlacementTarget>(
            r#"
            SELECT ie.store_id, ie.medicine_id, ie.price_cents, ie.stock, ie.is_active,
                   m.name AS medicine_name, u.store_verification_status
            FROM inventory_entries ie
            JOIN medicines m ON m.id = ie.medicine_id
            JOIN users u ON u.id = ie.store_id
            WHERE ie.id = ?
            "#,
        )
        .bind(entry_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Medicine", entry_id))?;

        if !target.is_active || target.store_verification_status != VerificationStatus::Verified {
            return Err(DbError::not_found("Medicine", entry_id));
        }

        let decremented = sqlx::query(
            r#"
            UPDATE inventory_entries
            SET stock = stock - ?, updated_at = ?
            WHERE id = ? AND is_active = 1 AND stock >= ?
            "#,
        )
        .bind(quantity)
        .bind(now)
        .bind(entry_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            return Err(CoreError::InsufficientStock {
                medicine: target.medicine_name,
                available: target.stock,
                requested: quantity,
            }
            .into());
        }

        let unit_price = Money::from_cents(target.price_cents);
        let order = Order {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            store_id: target.store_id,
            medicine_id: target.medicine_id,
            quantity,
            unit_price_cents: unit_price.cents(),
            total_cents: unit_price.multiply_quantity(quantity).cents(),
            status: OrderStatus::Pending,
            notes: notes.map(str::to_string),
            order_date: now,
            delivery_date: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(&format!(
            r#"
            INSERT INTO orders ({ORDER_COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        ))
        .bind(&order.id)
        .bind(&order.patient_id)
        .bind(&order.store_id)
        .bind(&order.medicine_id)
        .bind(order.quantity)
        .bind(order.unit_price_cents)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(order.notes.as_deref())
        .bind(order.order_date)
        .bind(order.delivery_date)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(order_id = %order.id, total_cents = order.total_cents, "Order placed");
        Ok(order)
    }

    /// Moves one of the store's orders to `target`.
    ///
    /// Notes are replaced when supplied and kept otherwise. Reaching
    /// `DELIVERED` stamps the delivery date. The status change is
    /// guarded by `status = current` in the WHERE clause, so a
    /// concurrent move loses cleanly.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] - order absent or owned by another store
    /// - `Domain(InvalidTransition)` - move not permitted from the
    ///   current status under `policy`
    pub async fn advance(
        &self,
        store_id: &str,
        order_id: &str,
        target: OrderStatus,
        policy: TransitionPolicy,
        notes: Option<&str>,
    ) -> DbResult<Order> {
        debug!(store_id = %store_id, order_id = %order_id, target = %target, "Advancing order");

        let current = self.get_for_store(store_id, order_id).await?;
        validate_transition(UserRole::MedicineStore, current.status, target, policy)?;

        let now = Utc::now();
        let delivered_at = (target == OrderStatus::Delivered).then_some(now);

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?,
                notes = COALESCE(?, notes),
                delivery_date = COALESCE(?, delivery_date),
                updated_at = ?
            WHERE id = ? AND store_id = ? AND status = ?
            "#,
        )
        .bind(target)
        .bind(notes)
        .bind(delivered_at)
        .bind(now)
        .bind(order_id)
        .bind(store_id)
        .bind(current.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Lost a race; report against the status that actually won.
            let fresh = self.get_for_store(store_id, order_id).await?;
            return Err(CoreError::InvalidTransition {
                from: fresh.status,
                to: target,
                role: UserRole::MedicineStore,
            }
            .into());
        }

        self.get_for_store(store_id, order_id).await
    }

    /// Cancels one of the patient's orders and returns the units to the
    /// store's shelf, both inside one transaction.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] - order absent or owned by another patient
    /// - `Domain(OrderNotCancellable)` - order already terminal
    pub async fn cancel(
        &self,
        patient_id: &str,
        order_id: &str,
        policy: TransitionPolicy,
    ) -> DbResult<Order> {
        debug!(patient_id = %patient_id, order_id = %order_id, "Cancelling order");

        let current = self.get_for_patient(patient_id, order_id).await?;
        validate_transition(UserRole::Patient, current.status, OrderStatus::Cancelled, policy)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // The WHERE clause re-checks cancellability so a concurrent
        // delivery cannot be undone.
        let cancelled = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?, updated_at = ?
            WHERE id = ? AND patient_id = ? AND status IN (?, ?, ?, ?)
            "#,
        )
        .bind(OrderStatus::Cancelled)
        .bind(now)
        .bind(order_id)
        .bind(patient_id)
        .bind(OrderStatus::Pending)
        .bind(OrderStatus::Confirmed)
        .bind(OrderStatus::Preparing)
        .bind(OrderStatus::ReadyForPickup)
        .execute(&mut *tx)
        .await?;

        if cancelled.rows_affected() == 0 {
            let fresh = self.get_for_patient(patient_id, order_id).await?;
            return Err(CoreError::OrderNotCancellable {
                status: fresh.status,
            }
            .into());
        }

        let restocked = sqlx::query(
            r#"
            UPDATE inventory_entries
            SET stock = stock + ?, updated_at = ?
            WHERE store_id = ? AND medicine_id = ?
            "#,
        )
        .bind(current.quantity)
        .bind(now)
        .bind(&current.store_id)
        .bind(&current.medicine_id)
        .execute(&mut *tx)
        .await?;

        if restocked.rows_affected() == 0 {
            warn!(
                order_id = %order_id,
                store_id = %current.store_id,
                medicine_id = %current.medicine_id,
                "Cancelled order had no shelf entry to restock"
            );
        }

        tx.commit().await?;

        self.get_for_patient(patient_id, order_id).await
    }

    /// The patient's order history, newest first, optionally narrowed
    /// to one status.
    pub async fn list_for_patient(
        &self,
        patient_id: &str,
        status: Option<OrderStatus>,
    ) -> DbResult<Vec<PatientOrderRow>> {
        let rows = sqlx::query_as::<_, PatientOrderRow>(
            r#"
            SELECT o.id, o.store_id, o.medicine_id, m.name AS medicine_name, m.dosage,
                   u.store_name, o.quantity, o.unit_price_cents, o.total_cents,
                   o.status, o.notes, o.order_date, o.delivery_date
            FROM orders o
            JOIN medicines m ON m.id = o.medicine_id
            JOIN users u ON u.id = o.store_id
            WHERE o.patient_id = ?1 AND (?2 IS NULL OR o.status = ?2)
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(patient_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// The store's order queue, newest first, optionally narrowed to
    /// one status.
    pub async fn list_for_store(
        &self,
        store_id: &str,
        status: Option<OrderStatus>,
    ) -> DbResult<Vec<StoreOrderRow>> {
        let rows = sqlx::query_as::<_, StoreOrderRow>(
            r#"
            SELECT o.id, o.patient_id, u.name AS patient_name, u.email AS patient_email,
                   o.medicine_id, m.name AS medicine_name, m.dosage,
                   o.quantity, o.unit_price_cents, o.total_cents,
                   o.status, o.notes, o.order_date, o.delivery_date
            FROM orders o
            JOIN medicines m ON m.id = o.medicine_id
            JOIN users u ON u.id = o.patient_id
            WHERE o.store_id = ?1 AND (?2 IS NULL OR o.status = ?2)
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(store_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Aggregated order statistics for one store: per-status counts,
    /// delivered revenue, and the trailing 30-day order count.
    pub async fn statistics(&self, store_id: &str) -> DbResult<OrderStatistics> {
        let counts: Vec<(OrderStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM orders WHERE store_id = ? GROUP BY status",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        let status_counts = counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();

        let total_revenue_cents = self.delivered_revenue(store_id).await?;

        let cutoff = Utc::now() - Duration::days(RECENT_ORDERS_WINDOW_DAYS);
        let recent_orders: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE store_id = ? AND datetime(created_at) >= datetime(?)
            "#,
        )
        .bind(store_id)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;

        Ok(OrderStatistics {
            status_counts,
            total_revenue_cents,
            recent_orders,
        })
    }

    /// All orders ever taken by the store (dashboard).
    pub async fn count_for_store(&self, store_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE store_id = ?")
            .bind(store_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Orders still demanding store-side work (dashboard).
    pub async fn count_open_for_store(&self, store_id: &str) -> DbResult<i64> {
        let [a, b, c] = OrderStatus::OPEN;
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE store_id = ? AND status IN (?, ?, ?)",
        )
        .bind(store_id)
        .bind(a)
        .bind(b)
        .bind(c)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Sum of `total_cents` over the store's delivered orders.
    pub async fn delivered_revenue(&self, store_id: &str) -> DbResult<i64> {
        let revenue: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_cents), 0) FROM orders WHERE store_id = ? AND status = ?",
        )
        .bind(store_id)
        .bind(OrderStatus::Delivered)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue)
    }

    /// One order, scoped to its store.
    async fn get_for_store(&self, store_id: &str, order_id: &str) -> DbResult<Order> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND store_id = ?"
        ))
        .bind(order_id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// One order, scoped to its buyer.
    async fn get_for_patient(&self, patient_id: &str, order_id: &str) -> DbResult<Order> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND patient_id = ?"
        ))
        .bind(order_id)
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
