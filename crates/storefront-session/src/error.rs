//! # Session Error Types
//!
//! Errors raised by the collaborators and the error the session boundary
//! hands to the view layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  KeyValueStore ── StoreError ───┐                                       │
//! │                                 ├──► logged, session falls back         │
//! │  CatalogSource ── CatalogError ─┘    (defaults / empty list)            │
//! │                                                                         │
//! │  change_currency("   ") ── ValidationError ──► SessionError ──► caller   │
//! │  open_sqlite(...)      ── DbError        ──► SessionError ──► caller   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only input validation and opening the backing database can fail a call.
//! Everything else degrades and keeps the session usable.

use serde::Serialize;
use storefront_core::ValidationError;
use storefront_db::DbError;
use thiserror::Error;

// =============================================================================
// Collaborator Errors
// =============================================================================

/// Failure of a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("Storage backend failed: {0}")]
    Backend(String),

    /// The backend is not accepting writes.
    #[error("Storage is read-only")]
    ReadOnly,
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Failure of a catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source could not be reached.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The source answered with something unusable.
    #[error("Catalog backend failed: {0}")]
    Backend(String),
}

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => CatalogError::Unavailable(e),
            DbError::PoolExhausted => {
                CatalogError::Unavailable("connection pool exhausted".to_string())
            }
            other => CatalogError::Backend(other.to_string()),
        }
    }
}

// =============================================================================
// Boundary Error
// =============================================================================

/// Error returned across the session boundary.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "currency is required"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Backing database could not be opened
    DatabaseError,

    /// Anything else
    Internal,
}

impl SessionError {
    /// Creates a new session error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        SessionError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SessionError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::validation(err.to_string())
    }
}

impl From<DbError> for SessionError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) => {
                SessionError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                SessionError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            other => {
                tracing::error!("Database error: {}", other);
                SessionError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for SessionError {}

/// Result type for session boundary operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_serializes_with_code() {
        let err: SessionError = ValidationError::Required {
            field: "currency_symbol".to_string(),
        }
        .into();

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["message"].as_str().unwrap().contains("currency_symbol"));
    }

    #[test]
    fn test_db_connection_error_maps_to_catalog_unavailable() {
        let err: CatalogError = DbError::ConnectionFailed("no file".to_string()).into();
        assert!(matches!(err, CatalogError::Unavailable(_)));

        let err: CatalogError = DbError::QueryFailed("syntax".to_string()).into();
        assert!(matches!(err, CatalogError::Backend(_)));
    }

    #[test]
    fn test_db_errors_map_to_database_code() {
        let err: SessionError = DbError::MigrationFailed("checksum".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database migration failed");
    }

    #[test]
    fn test_display_includes_code() {
        let err = SessionError::internal("disk full");
        assert_eq!(err.to_string(), "[Internal] disk full");
    }
}
