//! # Domain Types
//!
//! Core domain types used throughout Tillpoint.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    SaleType     │   │  PaymentType    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (backend)   │   │  Retail         │   │  Cash           │       │
//! │  │  item_code      │   │  Wholesale      │   │  Card / Online  │       │
//! │  │  sales_price    │   └─────────────────┘   │  Cheque         │       │
//! │  │  wholesale_price│                         │  Credit         │       │
//! │  │  mrp, stock     │   ┌─────────────────┐   └─────────────────┘       │
//! │  └─────────────────┘   │    TaxRate      │                              │
//! │                        │  bps (u32)      │   ┌─────────────────┐       │
//! │                        │  1000 = 10%     │   │    Customer     │       │
//! │                        └─────────────────┘   │  walk-in default│       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend owns every product and customer record; these types are
//! read-only snapshots of what it returned.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::WALK_IN_CUSTOMER;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%. The operator keys a percent; it is stored as bps so the
/// tax term stays integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage, rounded to the nearest basis
    /// point. Negative percentages clamp to zero.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tillpoint_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_percentage(Decimal::new(825, 2)).bps(), 825);
    /// ```
    pub fn from_percentage(pct: Decimal) -> Self {
        let bps = pct
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|b| b.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|b| b.to_u32())
            .unwrap_or(0);
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub fn percentage(&self) -> Decimal {
        Decimal::new(self.0 as i64, 2)
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as cached from the backend catalog.
///
/// Prices that were absent or non-numeric on the wire arrive here as zero;
/// the lenient parsing lives in the backend client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier. Cart lines merge on this.
    pub id: String,

    /// Display name shown to cashier and on the bill.
    pub name: String,

    /// Operator-facing item code.
    pub item_code: Option<String>,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Retail tier price.
    pub sales_price: Money,

    /// Wholesale tier price.
    pub wholesale_price: Money,

    /// Maximum retail price. Discounts are measured against it.
    pub mrp: Money,

    /// Stock figure at catalog load. Advisory only.
    #[ts(type = "number")]
    pub stock: Decimal,

    pub category: Option<String>,
}

impl Product {
    /// Checks the advisory stock ceiling for a cumulative quantity.
    #[inline]
    pub fn can_sell(&self, quantity: Decimal) -> bool {
        quantity <= self.stock
    }

    pub fn in_stock(&self) -> bool {
        self.stock > Decimal::ZERO
    }
}

// =============================================================================
// Sale Type
// =============================================================================

/// The price tier a cart is sold at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    #[default]
    Retail,
    Wholesale,
}

impl SaleType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleType::Retail => "retail",
            SaleType::Wholesale => "wholesale",
        }
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retail" => Ok(SaleType::Retail),
            "wholesale" => Ok(SaleType::Wholesale),
            other => Err(format!("unknown sale type '{}'", other)),
        }
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How the customer settles the bill.
///
/// `Credit` is the only type that may settle with less than the grand total
/// received; the shortfall is recorded as owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    Cash,
    Card,
    Online,
    Cheque,
    Credit,
}

impl PaymentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Card => "card",
            PaymentType::Online => "online",
            PaymentType::Cheque => "cheque",
            PaymentType::Credit => "credit",
        }
    }

    #[inline]
    pub const fn is_credit(&self) -> bool {
        matches!(self, PaymentType::Credit)
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Customer
// =============================================================================

/// The customer a bill is made out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Backend identifier. `None` for the walk-in customer.
    pub id: Option<String>,
    pub name: String,
    pub phone: Option<String>,
}

impl Customer {
    /// The default customer of every new bill.
    pub fn walk_in() -> Self {
        Customer {
            id: None,
            name: WALK_IN_CUSTOMER.to_string(),
            phone: None,
        }
    }

    pub fn is_walk_in(&self) -> bool {
        self.id.is_none()
    }
}

impl Default for Customer {
    fn default() -> Self {
        Customer::walk_in()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Test".to_string(),
            item_code: None,
            barcode: None,
            sales_price: Money::from_cents(100),
            wholesale_price: Money::from_cents(90),
            mrp: Money::from_cents(120),
            stock: Decimal::from(stock),
            category: None,
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert_eq!(rate.percentage(), Decimal::new(825, 2));
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(Decimal::from(10)).bps(), 1000);
        assert_eq!(TaxRate::from_percentage(Decimal::new(12345, 3)).bps(), 1235);
        assert_eq!(TaxRate::from_percentage(Decimal::from(-5)).bps(), 0);
    }

    #[test]
    fn test_product_can_sell() {
        let p = product(5);
        assert!(p.can_sell(Decimal::from(5)));
        assert!(!p.can_sell(Decimal::from(6)));
        assert!(p.in_stock());
        assert!(!product(0).in_stock());
    }

    #[test]
    fn test_sale_type_parse_and_display() {
        assert_eq!("Wholesale".parse::<SaleType>().unwrap(), SaleType::Wholesale);
        assert_eq!(" retail ".parse::<SaleType>().unwrap(), SaleType::Retail);
        assert!("bulk".parse::<SaleType>().is_err());
        assert_eq!(SaleType::default().to_string(), "retail");
    }

    #[test]
    fn test_payment_type_serialization() {
        let json = serde_json::to_string(&PaymentType::Cheque).unwrap();
        assert_eq!(json, "\"cheque\"");
        let parsed: PaymentType = serde_json::from_str("\"credit\"").unwrap();
        assert!(parsed.is_credit());
        assert_eq!(PaymentType::default(), PaymentType::Cash);
    }

    #[test]
    fn test_walk_in_customer() {
        let c = Customer::default();
        assert!(c.is_walk_in());
        assert_eq!(c.name, "Walk-in Customer");
    }
}
