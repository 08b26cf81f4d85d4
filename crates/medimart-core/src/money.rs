//! # Money Module
//!
//! Monetary values as integer cents.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  An order of 3 × 4.99 stored as floats drifts:                          │
//! │    3 × 4.99 = 14.969999999999999                                        │
//! │                                                                         │
//! │  The same order in integer cents is exact:                              │
//! │    3 × 499 = 1497                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices come in from the API as cents, are stored as cents, and go
//! back out as cents. [`Money`] is the typed wrapper at the points
//! where the domain does arithmetic on them, so a price can never be
//! confused with a quantity or a stock count.
//!
//! ```rust
//! use medimart_core::money::Money;
//!
//! let unit_price = Money::from_cents(499);
//! let total = unit_price.multiply_quantity(3);
//! assert_eq!(total.cents(), 1497);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value in the smallest currency unit.
///
/// Signed `i64`, matching SQLite's INTEGER affinity: the same number
/// lands in `price_cents` columns without conversion. Serializes as a
/// bare number, so wire payloads carry `"priceCents": 499` rather than
/// a nested object.
///
/// ## Where Money Flows
/// ```text
/// InventoryEntry.price_cents ──► Order.unit_price_cents (snapshot)
///                                     │
///                                     ▼
///                        Order.total_cents = unit_price × quantity
///                                     │
///                                     ▼
///                        statistics revenue (sum over DELIVERED)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Wraps a cent amount.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// The raw cent amount.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The order-total computation: frozen unit price times ordered
    /// quantity.
    ///
    /// ```rust
    /// use medimart_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(500);
    /// assert_eq!(unit_price.multiply_quantity(10).cents(), 5000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Human-readable form for logs and test output. API responses carry
/// raw cents; clients format for their own locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}
