//! # Error Types
//!
//! Domain-specific error types for tillpoint-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tillpoint-core errors (this file)                                     │
//! │  ├── CoreError        - Cart, session and settlement rule violations   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tillpoint-db errors (separate crate)                                  │
//! │  └── DbError          - Held-sale store failures                       │
//! │                                                                         │
//! │  tillpoint-remote errors (separate crate)                              │
//! │  └── RemoteError      - Backend timeouts, rejections, bad payloads     │
//! │                                                                         │
//! │  Register API errors (in app)                                          │
//! │  └── ApiError         - What the POS screen sees (serialized)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product, index, amounts)
//! 3. Errors are enum variants, never String
//! 4. No error discards the cart; callers can always retry

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the cached catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cumulative quantity on a line would exceed the cached stock figure.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5), line already holds 2
    ///      │
    ///      ▼
    /// Check stock: available=6, cumulative=7
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Rice 1kg", available: 6, requested: 7 }
    ///      │
    ///      ▼
    /// Screen shows: "Only 6 Rice 1kg in stock"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Invalid quantity: {reason}")]
    InvalidQuantity { reason: String },

    /// Quantity exceeds the per-line ceiling.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: Decimal, max: i64 },

    /// Received amount is short of the grand total for a non-credit payment.
    ///
    /// ## When This Occurs
    /// - Save pressed on a cash/card/online/cheque bill with `received < due`
    /// - The session stays in Editing; nothing is sent to the backend
    #[error("Insufficient payment: received {received}, due {due}")]
    InsufficientPayment { received: Money, due: Money },

    #[error("No cart line at index {0}")]
    LineNotFound(usize),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    #[error("No removal is pending")]
    NoPendingRemoval,

    #[error("Cart is empty")]
    EmptyCart,

    /// Resume of a held sale requires an empty cart.
    #[error("Cart is not empty")]
    CartNotEmpty,

    /// Checkout refuses lines whose quantity was cleared to zero.
    #[error("Cart has lines with zero quantity")]
    ZeroQuantityLines,

    /// The bill session is not in a state that allows the requested action.
    ///
    /// ## When This Occurs
    /// - Save pressed before a bill number arrived
    /// - Cancel pressed while a commit is in flight
    /// - Pay pressed while a session is already open
    #[error("Cannot {action} while bill session is {state}")]
    InvalidTransition { state: String, action: String },

    /// A commit for this bill is already in flight.
    #[error("Bill {bill_number} is already being committed")]
    CommitInFlight { bill_number: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., non-numeric amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A price tier is above the product's MRP.
    #[error("{field} ({price}) must not exceed MRP ({mrp})")]
    AboveMrp {
        field: String,
        price: Money,
        mrp: Money,
    },
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
        let err = CoreError::InsufficientStock {
            product: "Rice 1kg".to_string(),
            available: Decimal::from(6),
            requested: Decimal::from(7),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Rice 1kg: available 6, requested 7"
        );

        let err = CoreError::InsufficientPayment {
            received: Money::from_cents(10000),
            due: Money::from_cents(19500),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: received 100.00, due 195.00"
        );
    }

    #[test]
    fn test_transition_message() {
        let err = CoreError::InvalidTransition {
            state: "settling".to_string(),
            action: "cancel".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot cancel while bill session is settling");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
