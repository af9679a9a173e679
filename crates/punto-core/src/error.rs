//! # Error Types
//!
//! Domain-specific error types for punto-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  punto-core errors (this file)                                         │
//! │  ├── CoreError        - Cart and business rule failures                │
//! │  └── ValidationError  - Draft/input presence checks                    │
//! │                                                                         │
//! │  punto-client errors (separate crate)                                  │
//! │  └── ClientError      - Config, auth, HTTP failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → CLI (anyhow)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, line index, field)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A cart line references a product missing from the catalog snapshot.
    ///
    /// ## When This Occurs
    /// - Product deleted after the catalog was fetched
    /// - Id typed by hand that never existed
    ///
    /// `compute_totals` treats such a line as contributing zero; this error
    /// is raised only by the pre-submit check.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A line index is out of range.
    #[error("Cart line {index} does not exist (cart has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// Submitting a sale with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A line still has no product selected.
    #[error("Cart line {index} has no product selected")]
    ProductNotSelected { index: usize },

    /// A line has quantity zero.
    #[error("Cart line {index} has quantity 0")]
    ZeroQuantity { index: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The service re-validates everything; these are the presence checks a
/// form runs before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., not a number, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value in a list that must be distinct.
    #[error("{field} '{value}' is listed more than once")]
    Duplicate { field: String, value: String },

    /// Values that must agree with each other do not.
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::MustBePositive`].
    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }
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
    fn test_error_messages() {
        assert_eq!(CoreError::ProductNotFound(42).to_string(), "Product not found: 42");
        assert_eq!(
            CoreError::LineNotFound { index: 3, len: 2 }.to_string(),
            "Cart line 3 does not exist (cart has 2 lines)"
        );
        assert_eq!(
            CoreError::QuantityTooLarge { requested: 10000, max: 9999 }.to_string(),
            "Quantity 10000 exceeds maximum allowed (9999)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("productName").to_string(), "productName is required");
        assert_eq!(
            ValidationError::must_be_positive("quantity").to_string(),
            "quantity must be positive"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("taxName").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
