//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A browser-side cart doing 0.1 + 0.2 gets 0.30000000000000004, and a    │
//! │  bill of 3 × 33.33 drifts a paisa/cent from the printed total.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Every amount is stored in cents (i64).                               │
//! │    Quantities may be fractional (Decimal); multiplying by one rounds    │
//! │    to the nearest cent, half away from zero, exactly once per line.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tillpoint_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let total = price.times_quantity(Decimal::new(15, 1)); // × 1.5
//! assert_eq!(total.cents(), 1649); // 16.485 → 16.49
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents, paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: balances go negative for credit sales
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as cents**: the register API and held-sale payloads carry
///   integers; only the REST backend boundary converts to decimal units
///
/// ## Where Money is Used
/// ```text
/// Product.mrp / sales_price ──► CartLine.unit_price ──► CartLine.line_total
///                                      │
///                                      ▼
///        CartTotals.sub_total ──► tax ──► grand_total ──► Settlement.balance
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount in major units.
    ///
    /// Rounds to two places, half away from zero. Values outside the `i64`
    /// cent range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tillpoint_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(12345, 3)).cents(), 1235); // 12.345
    /// assert_eq!(Money::from_decimal(Decimal::new(-5, 1)).cents(), -50);     // -0.5
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let saturated = if amount.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        };
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|c| c.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|c| c.to_i64())
            .unwrap_or(saturated);
        Money(cents)
    }

    /// Returns the value as a decimal amount in major units (two places).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies a unit amount by a (possibly fractional) quantity.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tillpoint_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(9000);
    /// assert_eq!(unit_price.times_quantity(Decimal::from(2)).cents(), 18000);
    /// assert_eq!(unit_price.times_quantity(Decimal::new(25, 2)).cents(), 2250);
    /// ```
    pub fn times_quantity(&self, quantity: Decimal) -> Self {
        match self.to_decimal().checked_mul(quantity) {
            Some(total) => Money::from_decimal(total),
            None if self.is_negative() != quantity.is_sign_negative() => Money(i64::MIN),
            None => Money(i64::MAX),
        }
    }

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`,
    /// mirrored for negative amounts.
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    /// use tillpoint_core::types::TaxRate;
    ///
    /// let sub_total = Money::from_cents(20000);
    /// let tax = sub_total.calculate_tax(TaxRate::from_bps(1000)); // 10%
    /// assert_eq!(tax.cents(), 2000);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large bills from overflowing
        let product = self.0 as i128 * rate.bps() as i128;
        let tax = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money::from_cents(tax as i64)
    }

    /// Formats the amount with a currency symbol, e.g. `₹1,234.50` style
    /// without grouping: `Rs 1234.50`, `-$5.50`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Arithmetic saturates at the i64 cent range.

/// Plain two-decimal rendering, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
