//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  storefront-session errors                                             │
//! │  └── SessionError     - What the view layer sees (serialized)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Most cart paths never produce an error at all: malformed catalog data
//! resolves to defaults and removing a missing line is a no-op. What remains
//! here is the small set of failures a caller has to decide about.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A persisted cart payload could not be decoded.
    ///
    /// ## When This Occurs
    /// - The stored blob is not JSON
    /// - The JSON is not a list of cart lines
    ///
    /// The session treats this as "no stored cart" and starts empty.
    #[error("Malformed cart payload: {0}")]
    MalformedCart(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for intents that carry free-form text (currency symbol, category).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. control characters, separators).
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
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "currency".to_string(),
        };
        assert_eq!(err.to_string(), "currency is required");

        let err = ValidationError::TooLong {
            field: "category".to_string(),
            max: 64,
        };
        assert_eq!(err.to_string(), "category must be at most 64 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "currency".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_malformed_cart_from_serde() {
        let serde_err = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let core_err: CoreError = serde_err.into();
        assert!(core_err.to_string().starts_with("Malformed cart payload"));
    }
}
