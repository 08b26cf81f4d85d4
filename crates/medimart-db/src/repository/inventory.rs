//! # Inventory Repository
//!
//! Database operations for the medicine catalog and per-store shelves.
//!
//! ## Stocking Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Add-Stock Merge                                      │
//! │                                                                         │
//! │  Store posts: { name: "Paracetamol 500mg", category: "Analgesics",     │
//! │                 price: 500, stock: 40 }                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  medicines: lookup (name, category) ── absent? ──► create              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inventory_entries: lookup (store, medicine)                           │
//! │       │                                                                 │
//! │       ├── absent  → INSERT new entry                                   │
//! │       │                                                                 │
//! │       └── present → stock += 40        (merge, never overwrite)        │
//! │                     price  = 500       (latest price wins)             │
//! │                     min    = supplied? (keep prior when omitted)       │
//! │                                                                         │
//! │  Both steps share one transaction so concurrent adds cannot lose       │
//! │  an increment.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every store-scoped operation carries `store_id` in its WHERE clause;
//! an entry owned by another store reads as NotFound.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use medimart_core::{CoreError, OrderStatus, UserRole, VerificationStatus};

// =============================================================================
// Requests and Rows
// =============================================================================

/// Input for [`InventoryRepository::add_or_merge`]. Describes the medicine
/// and the stock being shelved.
#[derive(Debug, Clone)]
pub struct StockRequest {
    pub medicine_name: String,
    pub generic_name: Option<String>,
    pub category: String,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub min_stock_level: Option<i64>,
}

/// Manual correction for one entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct InventoryCorrection {
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock_level: Option<i64>,
}

/// Catalog browse/search filter. `None` filters are inactive.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Normalized substring, matched case-insensitively against medicine
    /// name, generic name, and category.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Narrow to a single store.
    pub store_id: Option<String>,
    /// Result cap.
    pub limit: u32,
}

/// One shelf line in the store dashboard: the entry joined with its
/// medicine details.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreInventoryRow {
    pub id: String,
    pub medicine_id: String,
    pub medicine_name: String,
    pub generic_name: Option<String>,
    pub category: String,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub min_stock_level: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One purchasable line in the patient catalog: active, in-stock entry
/// of a verified store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    /// Inventory entry id; this is what an order targets.
    pub id: String,
    pub medicine_id: String,
    pub name: String,
    pub generic_name: Option<String>,
    pub category: String,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub store_id: String,
    pub store_name: Option<String>,
}

const SHELF_COLUMNS: &str = r#"
    ie.id, ie.medicine_id, m.name AS medicine_name, m.generic_name,
    m.category, m.manufacturer, m.dosage,
    ie.price_cents, ie.stock, ie.min_stock_level, ie.is_active,
    ie.created_at, ie.updated_at
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// let entry = repo.add_or_merge(&store.id, &request).await?;
/// let alerts = repo.low_stock(&store.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Shelves stock for a medicine, creating the catalog row and the
    /// entry as needed.
    ///
    /// ## Merge Semantics
    /// For an existing `(store, medicine)` entry:
    /// * `stock` is **added** to the current stock
    /// * `price_cents` is overwritten
    /// * `min_stock_level` is overwritten only when supplied
    ///
    /// ## Returns
    /// The post-merge shelf row.
    pub async fn add_or_merge(
        &self,
        store_id: &str,
        request: &StockRequest,
    ) -> DbResult<StoreInventoryRow> {
        debug!(
            store_id = %store_id,
            medicine = %request.medicine_name,
            stock = request.stock,
            "Adding stock"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Catalog row is shared across stores; first stocking creates it.
        // OR IGNORE keeps a concurrent create from failing the merge.
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO medicines (
                id, name, generic_name, category, manufacturer,
                dosage, description, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&request.medicine_name)
        .bind(request.generic_name.as_deref())
        .bind(&request.category)
        .bind(request.manufacturer.as_deref())
        .bind(request.dosage.as_deref())
        .bind(request.description.as_deref())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let medicine_id: String =
            sqlx::query_scalar("SELECT id FROM medicines WHERE name = ? AND category = ?")
                .bind(&request.medicine_name)
                .bind(&request.category)
                .fetch_one(&mut *tx)
                .await?;

        let merged = sqlx::query(
            r#"
            UPDATE inventory_entries
            SET stock = stock + ?,
                price_cents = ?,
                min_stock_level = COALESCE(?, min_stock_level),
                updated_at = ?
            WHERE store_id = ? AND medicine_id = ?
            "#,
        )
        .bind(request.stock)
        .bind(request.price_cents)
        .bind(request.min_stock_level)
        .bind(now)
        .bind(store_id)
        .bind(&medicine_id)
        .execute(&mut *tx)
        .await?;

        let entry_id = if merged.rows_affected() == 0 {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                r#"
                INSERT INTO inventory_entries (
                    id, store_id, medicine_id, price_cents, stock,
                    min_stock_level, is_active, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(store_id)
            .bind(&medicine_id)
            .bind(request.price_cents)
            .bind(request.stock)
            .bind(request.min_stock_level)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            id
        } else {
            sqlx::query_scalar(
                "SELECT id FROM inventory_entries WHERE store_id = ? AND medicine_id = ?",
            )
            .bind(store_id)
            .bind(&medicine_id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;

        self.shelf_row(store_id, &entry_id).await
    }

    /// Applies a manual correction to one entry.
    ///
    /// Supplied fields are set absolutely; omitted fields keep their
    /// value. Ownership is part of the WHERE clause.
    pub async fn correct(
        &self,
        store_id: &str,
        entry_id: &str,
        changes: &InventoryCorrection,
    ) -> DbResult<StoreInventoryRow> {
        debug!(store_id = %store_id, entry_id = %entry_id, "Correcting inventory entry");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_entries
            SET price_cents = COALESCE(?, price_cents),
                stock = COALESCE(?, stock),
                min_stock_level = COALESCE(?, min_stock_level),
                updated_at = ?
            WHERE id = ? AND store_id = ?
            "#,
        )
        .bind(changes.price_cents)
        .bind(changes.stock)
        .bind(changes.min_stock_level)
        .bind(now)
        .bind(entry_id)
        .bind(store_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory entry", entry_id));
        }

        self.shelf_row(store_id, entry_id).await
    }

    /// Deactivates an entry, hiding it from the marketplace.
    ///
    /// ## Guard
    /// Fails with `Domain(PendingOrdersExist)` while any order for the
    /// entry's `(store, medicine)` pair is still `PENDING`, `CONFIRMED`,
    /// or `PREPARING`. The check and the flag write share a transaction.
    pub async fn deactivate(&self, store_id: &str, entry_id: &str) -> DbResult<()> {
        debug!(store_id = %store_id, entry_id = %entry_id, "Deactivating inventory entry");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let medicine_id: Option<String> = sqlx::query_scalar(
            "SELECT medicine_id FROM inventory_entries WHERE id = ? AND store_id = ?",
        )
        .bind(entry_id)
        .bind(store_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(medicine_id) = medicine_id else {
            return Err(DbError::not_found("Inventory entry", entry_id));
        };

        let open_orders: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE store_id = ? AND medicine_id = ? AND status IN (?, ?, ?)
            "#,
        )
        .bind(store_id)
        .bind(&medicine_id)
        .bind(OrderStatus::Pending)
        .bind(OrderStatus::Confirmed)
        .bind(OrderStatus::Preparing)
        .fetch_one(&mut *tx)
        .await?;

        if open_orders > 0 {
            return Err(CoreError::PendingOrdersExist { count: open_orders }.into());
        }

        sqlx::query("UPDATE inventory_entries SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Lists the store's active shelf, newest first.
    pub async fn list_for_store(&self, store_id: &str) -> DbResult<Vec<StoreInventoryRow>> {
        let rows = sqlx::query_as::<_, StoreInventoryRow>(&format!(
            r#"
            SELECT {SHELF_COLUMNS}
            FROM inventory_entries ie
            JOIN medicines m ON m.id = ie.medicine_id
            WHERE ie.store_id = ? AND ie.is_active = 1
            ORDER BY ie.created_at DESC
            "#
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists active entries at or below their restock threshold, most
    /// depleted first. Entries without a threshold never alert.
    pub async fn low_stock(&self, store_id: &str) -> DbResult<Vec<StoreInventoryRow>> {
        let rows = sqlx::query_as::<_, StoreInventoryRow>(&format!(
            r#"
            SELECT {SHELF_COLUMNS}
            FROM inventory_entries ie
            JOIN medicines m ON m.id = ie.medicine_id
            WHERE ie.store_id = ?
              AND ie.is_active = 1
              AND ie.min_stock_level IS NOT NULL
              AND ie.stock <= ie.min_stock_level
            ORDER BY ie.stock, m.name
            "#
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One shelf row by entry id, ownership enforced.
    pub async fn shelf_row(&self, store_id: &str, entry_id: &str) -> DbResult<StoreInventoryRow> {
        sqlx::query_as::<_, StoreInventoryRow>(&format!(
            r#"
            SELECT {SHELF_COLUMNS}
            FROM inventory_entries ie
            JOIN medicines m ON m.id = ie.medicine_id
            WHERE ie.id = ? AND ie.store_id = ?
            "#
        ))
        .bind(entry_id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Inventory entry", entry_id))
    }

    /// Browses/searches the patient-facing catalog.
    ///
    /// Only active, in-stock entries of `VERIFIED` stores are visible.
    /// The search term matches name, generic name, and category,
    /// case-insensitively. Sorted by medicine name.
    pub async fn search_catalog(&self, filter: &CatalogFilter) -> DbResult<Vec<CatalogRow>> {
        let pattern = filter
            .search
            .as_ref()
            .map(|s| format!("%{}%", s.to_lowercase()));

        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT ie.id, ie.medicine_id, m.name, m.generic_name, m.category,
                   m.manufacturer, m.dosage, m.description,
                   ie.price_cents, ie.stock, ie.store_id, u.store_name
            FROM inventory_entries ie
            JOIN medicines m ON m.id = ie.medicine_id
            JOIN users u ON u.id = ie.store_id
            WHERE ie.is_active = 1
              AND ie.stock > 0
              AND u.role = ?1
              AND u.store_verification_status = ?2
              AND (?3 IS NULL
                   OR lower(m.name) LIKE ?3
                   OR lower(m.generic_name) LIKE ?3
                   OR lower(m.category) LIKE ?3)
              AND (?4 IS NULL OR m.category = ?4)
              AND (?5 IS NULL OR ie.store_id = ?5)
            ORDER BY m.name, u.store_name
            LIMIT ?6
            "#,
        )
        .bind(UserRole::MedicineStore)
        .bind(VerificationStatus::Verified)
        .bind(pattern)
        .bind(filter.category.as_deref())
        .bind(filter.store_id.as_deref())
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts the store's active entries (dashboard).
    pub async fn count_active(&self, store_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_entries WHERE store_id = ? AND is_active = 1",
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts the store's low-stock entries (dashboard).
    pub async fn count_low_stock(&self, store_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM inventory_entries
            WHERE store_id = ?
              AND is_active = 1
              AND min_stock_level IS NOT NULL
              AND stock <= min_stock_level
            "#,
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
