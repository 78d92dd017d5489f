//! # Pricing Rule
//!
//! Maps a product and the cart's sale type to a unit price and a per-unit
//! discount measured against MRP.
//!
//! ```text
//!   SaleType::Retail     → unit_price = sales_price
//!   SaleType::Wholesale  → unit_price = wholesale_price
//!   unit_discount        = max(mrp − unit_price, 0)
//! ```
//!
//! Pure and total: a zero price tier yields a zero unit price, and a tier
//! above MRP yields a zero discount rather than an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, SaleType};

/// The three price tiers of a product, frozen onto a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceTiers {
    pub sales_price: Money,
    pub wholesale_price: Money,
    pub mrp: Money,
}

impl PriceTiers {
    pub fn of(product: &Product) -> Self {
        PriceTiers {
            sales_price: product.sales_price,
            wholesale_price: product.wholesale_price,
            mrp: product.mrp,
        }
    }

    /// Returns the tier price for a sale type.
    #[inline]
    pub fn price(&self, sale_type: SaleType) -> Money {
        match sale_type {
            SaleType::Retail => self.sales_price,
            SaleType::Wholesale => self.wholesale_price,
        }
    }

    /// Prices one unit at the given sale type.
    pub fn unit_pricing(&self, sale_type: SaleType) -> UnitPricing {
        let unit_price = self.price(sale_type);
        let unit_discount = (self.mrp - unit_price).max(Money::zero());
        UnitPricing {
            unit_price,
            unit_discount,
        }
    }

    /// True when MRP sits below either tier (discount would be negative).
    pub fn is_anomalous(&self) -> bool {
        self.sales_price > self.mrp || self.wholesale_price > self.mrp
    }
}

/// Unit price and per-unit discount for one sale type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnitPricing {
    pub unit_price: Money,
    pub unit_discount: Money,
}

/// Prices a product for a sale type.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tillpoint_core::{price_for, Money, Product, SaleType};
///
/// let product = Product {
///     id: "p-1".to_string(),
///     name: "Rice".to_string(),
///     item_code: None,
///     barcode: None,
///     sales_price: Money::from_cents(9000),
///     wholesale_price: Money::from_cents(8500),
///     mrp: Money::from_cents(10000),
///     stock: Decimal::from(10),
///     category: None,
/// };
///
/// let wholesale = price_for(&product, SaleType::Wholesale);
/// assert_eq!(wholesale.unit_price.cents(), 8500);
/// assert_eq!(wholesale.unit_discount.cents(), 1500);
/// ```
pub fn price_for(product: &Product, sale_type: SaleType) -> UnitPricing {
    PriceTiers::of(product).unit_pricing(sale_type)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(sales: i64, wholesale: i64, mrp: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Test".to_string(),
            item_code: None,
            barcode: None,
            sales_price: Money::from_cents(sales),
            wholesale_price: Money::from_cents(wholesale),
            mrp: Money::from_cents(mrp),
            stock: Decimal::from(10),
            category: None,
        }
    }

    #[test]
    fn test_retail_pricing() {
        let pricing = price_for(&product(9000, 8500, 10000), SaleType::Retail);
        assert_eq!(pricing.unit_price.cents(), 9000);
        assert_eq!(pricing.unit_discount.cents(), 1000);
    }

    #[test]
    fn test_wholesale_pricing() {
        let pricing = price_for(&product(9000, 8500, 10000), SaleType::Wholesale);
        assert_eq!(pricing.unit_price.cents(), 8500);
        assert_eq!(pricing.unit_discount.cents(), 1500);
    }

    #[test]
    fn test_discount_clamped_when_mrp_below_price() {
        let p = product(12000, 8500, 10000);
        let pricing = price_for(&p, SaleType::Retail);
        assert_eq!(pricing.unit_price.cents(), 12000);
        assert_eq!(pricing.unit_discount.cents(), 0);
        assert!(PriceTiers::of(&p).is_anomalous());
    }

    #[test]
    fn test_missing_prices_price_at_zero() {
        let pricing = price_for(&product(0, 0, 0), SaleType::Wholesale);
        assert!(pricing.unit_price.is_zero());
        assert!(pricing.unit_discount.is_zero());
    }
}
