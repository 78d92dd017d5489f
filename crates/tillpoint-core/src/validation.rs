//! # Validation Module
//!
//! Input validation utilities for Tillpoint.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: POS screen                                                   │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register command (Rust)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Retail backend                                               │
//! │  └── Authoritative stock, bill number uniqueness                       │
//! │                                                                         │
//! │  Validation errors never reach the network layer.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tillpoint_core::validation::{parse_quantity_input, validate_quantity};
//!
//! let qty = parse_quantity_input("2.5");
//! assert!(validate_quantity(qty).is_ok());
//! assert_eq!(parse_quantity_input("abc"), Decimal::ZERO);
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_AMOUNT, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (search returns nothing)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a bill number before it is attached to a session.
pub fn validate_bill_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "bill number".to_string(),
        });
    }

    if number.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "bill number".to_string(),
            max: 50,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being added to the cart.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Operator enters quantity: 1.5                                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(1.5) ← THIS FUNCTION                                │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 99999? → Error: "quantity must be between ..."         │
/// │       │                                                                 │
/// │       └── OK → Proceed with add                                        │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    check_quantity_ceiling(qty)
}

/// Validates a quantity keyed into an existing line. Zero is allowed.
pub fn validate_line_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    check_quantity_ceiling(qty)
}

fn check_quantity_ceiling(qty: Decimal) -> ValidationResult<()> {
    if qty > Decimal::from(MAX_LINE_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a quantity typed into a line's quantity field.
///
/// Blank or non-numeric input becomes zero, so a cleared field leaves a
/// zero-quantity line instead of an error.
pub fn parse_quantity_input(input: &str) -> Decimal {
    Decimal::from_str(input.trim()).unwrap_or(Decimal::ZERO)
}

/// Validates a tax percent.
///
/// ## Rules
/// - Must be between 0 and 100
/// - At most two decimal places, since rates are held in basis points
pub fn validate_tax_percent(pct: Decimal) -> ValidationResult<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "tax percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    if pct.normalize().scale() > 2 {
        return Err(ValidationError::InvalidFormat {
            field: "tax percent".to_string(),
            reason: "at most two decimal places".to_string(),
        });
    }

    Ok(())
}

/// Validates an operator-entered amount (bill discount, shipping, received).
///
/// ## Rules
/// - Not negative
/// - At most [`MAX_AMOUNT`]
///
/// ## Example
/// ```rust
/// use tillpoint_core::money::Money;
/// use tillpoint_core::validation::validate_amount;
///
/// assert!(validate_amount("shipping", Money::from_cents(500)).is_ok());
/// assert!(validate_amount("shipping", Money::zero()).is_ok());
/// assert!(validate_amount("shipping", Money::from_cents(-1)).is_err());
/// assert!(validate_amount("shipping", Money::from_cents(i64::MAX)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if amount > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT.major(),
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product's price tiers at the product-edit boundary.
///
/// ## Rules
/// - No tier is negative
/// - MRP is at least both the retail and wholesale price
///
/// The cart never calls this; pricing clamps discounts to zero instead.
pub fn validate_product_prices(product: &Product) -> ValidationResult<()> {
    validate_amount("mrp", product.mrp)?;
    validate_amount("sales price", product.sales_price)?;
    validate_amount("wholesale price", product.wholesale_price)?;

    for (field, price) in [
        ("sales price", product.sales_price),
        ("wholesale price", product.wholesale_price),
    ] {
        if price > product.mrp {
            return Err(ValidationError::AboveMrp {
                field: field.to_string(),
                price,
                mrp: product.mrp,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
