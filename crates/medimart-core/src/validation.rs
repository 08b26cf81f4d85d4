//! # Validation Module
//!
//! Input validation rules for MediMart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (Axum)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: field and range validation                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories (SQL)                                           │
//! │  ├── Conditional writes (stock >= quantity guards)                     │
//! │  └── Ownership scoping (WHERE store_id = ?)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  ├── CHECK constraints (stock >= 0, price > 0)                         │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use medimart_core::validation::{validate_price_cents, validate_quantity};
//!
//! // Validate price before writing an inventory entry
//! validate_price_cents(500).unwrap();
//!
//! // Validate quantity before placing an order
//! validate_quantity(10).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{DEFAULT_SEARCH_LIMIT, MAX_ORDER_QUANTITY, MAX_SEARCH_LIMIT, MIN_SEARCH_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Catalog Field Validators
// =============================================================================

/// Validates a medicine display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use medimart_core::validation::validate_medicine_name;
///
/// assert!(validate_medicine_name("Paracetamol 500mg").is_ok());
/// assert!(validate_medicine_name("").is_err());
/// ```
pub fn validate_medicine_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "medicineName".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "medicineName".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a medicine category.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be strictly positive (> 0); nothing is given away for free
///
/// ## Example
/// ```rust
/// use medimart_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(500).is_ok());   // 5.00
/// assert!(validate_price_cents(0).is_err());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero means sold out, not invalid
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::CannotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a restock threshold.
///
/// ## Rules
/// - Must be non-negative when supplied
pub fn validate_min_stock_level(level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::CannotBeNegative {
            field: "minStockLevel".to_string(),
        });
    }

    Ok(())
}

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ORDER_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Place Order                                                            │
/// │                                                                         │
/// │  Patient enters quantity: 10                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(10) ← THIS FUNCTION                                 │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Proceed with conditional stock decrement                │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ORDER_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Search Validators
// =============================================================================

/// Normalizes a catalog search query.
///
/// ## Rules
/// - Trimmed
/// - Maximum 100 characters
/// - Shorter than MIN_SEARCH_QUERY_LEN (2): the caller should return an
///   empty result set, signalled here by `None`
///
/// ## Example
/// ```rust
/// use medimart_core::validation::normalize_search_query;
///
/// assert_eq!(normalize_search_query("para").unwrap(), Some("para".to_string()));
/// assert_eq!(normalize_search_query("p").unwrap(), None);
/// assert_eq!(normalize_search_query("  ").unwrap(), None);
/// ```
pub fn normalize_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    if query.len() < MIN_SEARCH_QUERY_LEN {
        return Ok(None);
    }

    Ok(Some(query.to_string()))
}

/// Resolves the effective result limit for a search/browse call.
///
/// Missing limit falls back to DEFAULT_SEARCH_LIMIT (50); anything
/// requested is clamped into `1..=MAX_SEARCH_LIMIT`.
pub fn effective_limit(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT)
}

// =============================================================================
// Store Profile Validators
// =============================================================================

/// Validates the store profile supplied at onboarding.
///
/// ## Rules
/// - `store_name`: required, at most 100 characters
/// - `store_address`: required, 10 to 500 characters
/// - `store_phone`: required, at least 10 characters, digits plus
///   `+ - ( )` and spaces
/// - `store_license`: required, at most 50 characters
/// - `store_description`: optional, 20 to 1000 characters when given
pub fn validate_store_profile(
    store_name: &str,
    store_address: &str,
    store_phone: &str,
    store_license: &str,
    store_description: Option<&str>,
) -> ValidationResult<()> {
    let license = store_license.trim();
    if license.is_empty() {
        return Err(ValidationError::Required {
            field: "storeLicense".to_string(),
        });
    }
    if license.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "storeLicense".to_string(),
            max: 50,
        });
    }

    validate_store_contact(store_name, store_address, store_phone, store_description)
}

/// Validates the mutable store profile fields (profile updates).
///
/// Same rules as [`validate_store_profile`] minus the license, which is
/// immutable after onboarding.
pub fn validate_store_contact(
    store_name: &str,
    store_address: &str,
    store_phone: &str,
    store_description: Option<&str>,
) -> ValidationResult<()> {
    let name = store_name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "storeName".to_string(),
        });
    }
    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "storeName".to_string(),
            max: 100,
        });
    }

    let address = store_address.trim();
    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "storeAddress".to_string(),
        });
    }
    if address.len() < 10 {
        return Err(ValidationError::TooShort {
            field: "storeAddress".to_string(),
            min: 10,
        });
    }
    if address.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "storeAddress".to_string(),
            max: 500,
        });
    }

    let phone = store_phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "storePhone".to_string(),
        });
    }
    if phone.len() < 10 {
        return Err(ValidationError::TooShort {
            field: "storePhone".to_string(),
            min: 10,
        });
    }
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "storePhone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    if let Some(description) = store_description {
        let description = description.trim();
        if !description.is_empty() {
            if description.len() < 20 {
                return Err(ValidationError::TooShort {
                    field: "storeDescription".to_string(),
                    min: 20,
                });
            }
            if description.len() > 1000 {
                return Err(ValidationError::TooLong {
                    field: "storeDescription".to_string(),
                    max: 1000,
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Misc Validators
// =============================================================================

/// Validates an optional order note.
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.len() > 1000 {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: 1000,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use medimart_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_medicine_name() {
        assert!(validate_medicine_name("Paracetamol 500mg").is_ok());
        assert!(validate_medicine_name("").is_err());
        assert!(validate_medicine_name("   ").is_err());
        assert!(validate_medicine_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Analgesics").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_category(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(500).is_ok());
        assert!(validate_price_cents(1).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(100).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_normalize_search_query() {
        // "para" is long enough to search
        assert_eq!(
            normalize_search_query("para").unwrap(),
            Some("para".to_string())
        );
        // One character is below the minimum: empty result, not an error
        assert_eq!(normalize_search_query("p").unwrap(), None);
        assert_eq!(normalize_search_query("").unwrap(), None);
        assert_eq!(normalize_search_query("  a  ").unwrap(), None);
        // Whitespace is trimmed before the length check
        assert_eq!(
            normalize_search_query("  pa  ").unwrap(),
            Some("pa".to_string())
        );
        assert!(normalize_search_query(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None), 50);
        assert_eq!(effective_limit(Some(10)), 10);
        assert_eq!(effective_limit(Some(0)), 1);
        assert_eq!(effective_limit(Some(5000)), 200);
    }

    #[test]
    fn test_validate_store_profile() {
        assert!(validate_store_profile(
            "City Pharmacy",
            "12 Harbour Road, Dockside",
            "+1 555 010 9900",
            "PH-2291",
            Some("Open late, full prescription counter."),
        )
        .is_ok());

        // Missing license
        assert!(validate_store_profile(
            "City Pharmacy",
            "12 Harbour Road, Dockside",
            "+1 555 010 9900",
            "",
            None,
        )
        .is_err());

        // Address too short
        assert!(validate_store_profile(
            "City Pharmacy",
            "12 HR",
            "+1 555 010 9900",
            "PH-2291",
            None,
        )
        .is_err());

        // Phone with letters
        assert!(validate_store_profile(
            "City Pharmacy",
            "12 Harbour Road, Dockside",
            "call-me-maybe",
            "PH-2291",
            None,
        )
        .is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
