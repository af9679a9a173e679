//! # Validation Module
//!
//! Presence checks run before a draft is sent to the REST service.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input parsing (CLI / form)                                   │
//! │  ├── parse_quantity, Money::from_str                                   │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Draft validation (THIS MODULE)                               │
//! │  ├── Required fields present                                           │
//! │  └── Numbers in range, totals consistent                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST service                                                 │
//! │  └── Owns schema validation and referential integrity                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use punto_core::validation::{parse_quantity, validate_required};
//!
//! validate_required("productName", "Arroz").unwrap();
//! assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
//! assert!(parse_quantity("0").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{TaxRate, MAX_TAX_RATE_BPS};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Implemented by every draft type sent to the service.
pub trait Validate {
    /// Checks the draft, returning the first problem found.
    fn validate(&self) -> ValidationResult<()>;
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is present after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates an optional text field that must nevertheless be filled in.
pub fn validate_required_opt(field: &str, value: Option<&str>) -> ValidationResult<()> {
    validate_required(field, value.unwrap_or_default())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@`, with text on both sides
/// - No whitespace inside
///
/// ## Example
/// ```rust
/// use punto_core::validation::validate_email;
///
/// assert!(validate_email("customerEmail", "ana@punto.co").is_ok());
/// assert!(validate_email("customerEmail", "ana@").is_err());
/// assert!(validate_email("customerEmail", "").is_err());
/// ```
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    validate_required(field, value)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if value.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(invalid("must look like name@domain")),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price. Zero is allowed.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a stock count. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "productStock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a tax rate: 0% to 100%.
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "taxPercentage".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (9999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates a referenced id: ids assigned by the service are positive.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(())
}

/// Parses a quantity typed by a person.
///
/// ```rust
/// use punto_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity("12").unwrap(), 12);
/// assert!(parse_quantity("-1").is_err());
/// assert!(parse_quantity("two").is_err());
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<u32> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::required("quantity"));
    }

    let value: i64 = input.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("'{}' is not a whole number", input),
    })?;

    if value <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    let qty = u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: MAX_ITEM_QUANTITY as i64,
    })?;
    validate_quantity(qty)?;
    Ok(qty)
}

// =============================================================================
// Consistency Validators
// =============================================================================

/// Validates `total == subtotal + taxes` with no negative part.
pub fn validate_totals(field: &str, subtotal: Money, taxes: Money, total: Money) -> ValidationResult<()> {
    validate_price(field, subtotal)?;
    validate_price(field, taxes)?;
    validate_price(field, total)?;

    if subtotal + taxes != total {
        return Err(ValidationError::Inconsistent {
            field: field.to_string(),
            reason: format!("{} + {} != {}", subtotal, taxes, total),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
