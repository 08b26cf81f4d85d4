//! # Database Error Types
//!
//! [`DbError`] is what every repository method returns. It folds three
//! sources into one taxonomy:
//!
//! | Source                               | Variant                      |
//! |--------------------------------------|------------------------------|
//! | sqlx / SQLite failures               | `UniqueViolation`, `ForeignKeyViolation`, `QueryFailed`, ... |
//! | Rows that are absent (or not yours)  | `NotFound`                   |
//! | Business preconditions checked in SQL| `Domain` (transparent)       |
//!
//! The `Domain` variant matters most: conflicts the repositories detect
//! inside a transaction (a conditional stock decrement that matches zero
//! rows, a deactivation blocked by open orders) are raised as
//! `medimart_core::CoreError` and pass through unchanged, so the HTTP
//! layer maps one business taxonomy no matter where a rule fired.

use medimart_core::CoreError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No matching row. Ownership lives in WHERE clauses, so a row
    /// owned by someone else reads as absent too.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// UNIQUE constraint hit: duplicate user email or auth id, or a
    /// second `(store, medicine)` entry racing `add_or_merge`.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// FOREIGN KEY constraint hit, such as an order row referencing a
    /// user or medicine that is gone.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A business precondition failed inside a database operation.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Could not open or create the database file.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A pending migration did not apply cleanly.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed for a non-constraint reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// All pool connections stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that has no mapping above.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Classifies a SQLite error message into a constraint variant.
///
/// SQLite reports constraints as text rather than distinct codes:
/// `"UNIQUE constraint failed: users.email"` or
/// `"FOREIGN KEY constraint failed"`. The violated column rides along
/// only for UNIQUE, so that is the one case with a parsed field.
fn classify_database_message(msg: &str) -> DbError {
    const UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

    if let Some(rest) = msg.split(UNIQUE_PREFIX).nth(1) {
        DbError::UniqueViolation {
            field: rest.to_string(),
            value: "unknown".to_string(),
        }
    } else if msg.contains("FOREIGN KEY constraint failed") {
        DbError::ForeignKeyViolation {
            message: msg.to_string(),
        }
    } else {
        DbError::QueryFailed(msg.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => classify_database_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_message_yields_field() {
        let err = classify_database_message("UNIQUE constraint failed: users.email");
        match err {
            DbError::UniqueViolation { field, .. } => assert_eq!(field, "users.email"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_key_message_classified() {
        let err = classify_database_message("FOREIGN KEY constraint failed");
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[test]
    fn test_other_messages_fall_through() {
        let err = classify_database_message("no such table: receipts");
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[test]
    fn test_domain_error_passes_through() {
        let err = DbError::from(CoreError::StoreAlreadyVerified);
        assert!(matches!(err, DbError::Domain(CoreError::StoreAlreadyVerified)));
    }
}
