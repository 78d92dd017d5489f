//! # Settlement Calculator
//!
//! Balance and payment sufficiency for a bill.
//!
//! ```text
//! balance = received − grand_total
//!
//!   payment type   received < grand_total   result
//!   ────────────   ──────────────────────   ─────────────────────────────
//!   cash/card/...  yes                      InsufficientPayment
//!   cash/card/...  no                       ok, change = balance
//!   credit         either                   ok, amount owed = −balance
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentType;

/// `received − grand_total`. Negative when the customer still owes.
#[inline]
pub fn balance(received: Money, grand_total: Money) -> Money {
    received - grand_total
}

/// Checks that a payment covers the bill.
///
/// ## Example
/// ```rust
/// use tillpoint_core::money::Money;
/// use tillpoint_core::settlement::validate;
/// use tillpoint_core::types::PaymentType;
///
/// let due = Money::from_cents(19500);
/// assert!(validate(PaymentType::Cash, Money::from_cents(15000), due).is_err());
/// assert!(validate(PaymentType::Credit, Money::zero(), due).is_ok());
/// ```
pub fn validate(payment_type: PaymentType, received: Money, grand_total: Money) -> CoreResult<()> {
    if !payment_type.is_credit() && received < grand_total {
        return Err(CoreError::InsufficientPayment {
            received,
            due: grand_total,
        });
    }
    Ok(())
}

/// A validated payment against a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub payment_type: PaymentType,
    pub received: Money,
    pub grand_total: Money,
    pub balance: Money,
}

impl Settlement {
    /// Validates and builds a settlement.
    pub fn settle(
        payment_type: PaymentType,
        received: Money,
        grand_total: Money,
    ) -> CoreResult<Self> {
        validate(payment_type, received, grand_total)?;
        Ok(Settlement {
            payment_type,
            received,
            grand_total,
            balance: balance(received, grand_total),
        })
    }

    /// Change to hand back. Zero for credit bills.
    pub fn change(&self) -> Money {
        if self.payment_type.is_credit() {
            Money::zero()
        } else {
            self.balance.max(Money::zero())
        }
    }

    /// What the customer still owes on a credit bill.
    pub fn amount_owed(&self) -> Money {
        if self.payment_type.is_credit() {
            (-self.balance).max(Money::zero())
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
