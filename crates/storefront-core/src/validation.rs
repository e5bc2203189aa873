//! # Validation Module
//!
//! Checks for the free-text intents the view layer sends: currency
//! selection and category selection. Cart mutations carry catalog records
//! and need no validation (malformed records resolve to defaults).
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_category, validate_currency_symbol};
//!
//! assert_eq!(validate_currency_symbol(" £ ").unwrap(), "£");
//! assert_eq!(validate_category("tech").unwrap(), "tech");
//! assert!(validate_currency_symbol("").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted currency symbol (`A$`, `CHF`, ...).
pub const MAX_CURRENCY_SYMBOL_LEN: usize = 8;

/// Longest accepted category name.
pub const MAX_CATEGORY_LEN: usize = 64;

/// Validates a currency symbol and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - At most 8 characters
/// - No whitespace or control characters inside
pub fn validate_currency_symbol(symbol: &str) -> ValidationResult<String> {
    let symbol = symbol.trim();

    if symbol.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if symbol.chars().count() > MAX_CURRENCY_SYMBOL_LEN {
        return Err(ValidationError::TooLong {
            field: "currency".to_string(),
            max: MAX_CURRENCY_SYMBOL_LEN,
        });
    }

    if symbol.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(symbol.to_string())
}

/// Validates a category name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty (use `all` to disable filtering)
/// - At most 64 characters
/// - No control characters
pub fn validate_category(category: &str) -> ValidationResult<String> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }

    if category.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "category".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_currency_symbol() {
        assert_eq!(validate_currency_symbol("$").unwrap(), "$");
        assert_eq!(validate_currency_symbol("A$").unwrap(), "A$");
        assert!(matches!(
            validate_currency_symbol("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_currency_symbol("DOLLARSSS"),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_currency_symbol("U S"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(validate_category(" clothes ").unwrap(), "clothes");
        assert_eq!(validate_category("all").unwrap(), "all");
        assert!(validate_category("").is_err());
        assert!(validate_category(&"c".repeat(65)).is_err());
        assert!(validate_category("te\u{0007}ch").is_err());
    }
}
