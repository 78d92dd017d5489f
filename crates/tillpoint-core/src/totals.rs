//! # Cart Totals
//!
//! Figures derived from a cart on demand. Never stored, so they cannot go
//! stale against the lines.
//!
//! ## Derivation
//! ```text
//! per line (each rounded to the cent):
//!     mrp_total      = mrp × qty
//!     discount_total = unit_discount × qty
//!
//! sub_total           = Σ mrp_total
//! total_item_discount = Σ discount_total
//! total_discount      = total_item_discount + bill_discount
//! tax_amount          = sub_total × tax%
//! grand_total         = sub_total + tax_amount − total_discount + shipping
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::Money;
use crate::types::TaxRate;

/// Totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    #[ts(type = "number")]
    pub total_qty: Decimal,
    /// Σ mrp × qty.
    pub sub_total: Money,
    pub total_item_discount: Money,
    pub bill_discount: Money,
    pub total_discount: Money,
    pub tax_amount: Money,
    pub shipping: Money,
    /// Σ unit price × qty, what the lines sell for before bill-level terms.
    pub items_total: Money,
    pub grand_total: Money,
}

impl CartTotals {
    /// Derives totals from lines and bill-level adjustments.
    pub fn compute(
        lines: &[CartLine],
        tax_rate: TaxRate,
        bill_discount: Money,
        shipping: Money,
    ) -> Self {
        let total_qty: Decimal = lines.iter().map(|l| l.quantity).sum();
        let sub_total: Money = lines.iter().map(CartLine::mrp_total).sum();
        let total_item_discount: Money = lines.iter().map(CartLine::discount_total).sum();
        let items_total: Money = lines.iter().map(CartLine::line_total).sum();

        let total_discount = total_item_discount + bill_discount;
        let tax_amount = sub_total.calculate_tax(tax_rate);
        let grand_total = sub_total + tax_amount - total_discount + shipping;

        CartTotals {
            line_count: lines.len(),
            total_qty,
            sub_total,
            total_item_discount,
            bill_discount,
            total_discount,
            tax_amount,
            shipping,
            items_total,
            grand_total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, SaleType};

    fn line(sales: i64, mrp: i64, qty: Decimal) -> CartLine {
        let product = Product {
            id: format!("p-{}", sales),
            name: "Test".to_string(),
            item_code: None,
            barcode: None,
            sales_price: Money::from_cents(sales),
            wholesale_price: Money::from_cents(sales),
            mrp: Money::from_cents(mrp),
            stock: Decimal::from(1000),
            category: None,
        };
        CartLine::from_product(&product, qty, SaleType::Retail)
    }

    #[test]
    fn test_scenario_a_single_line() {
        let lines = vec![line(9000, 10000, Decimal::from(2))];
        let totals = CartTotals::compute(&lines, TaxRate::zero(), Money::zero(), Money::zero());

        assert_eq!(totals.sub_total.cents(), 20000);
        assert_eq!(totals.total_item_discount.cents(), 2000);
        assert_eq!(totals.items_total.cents(), 18000);
        assert_eq!(totals.grand_total.cents(), 18000);
        assert_eq!(totals.total_qty, Decimal::from(2));
    }

    #[test]
    fn test_scenario_b_tax_and_bill_discount() {
        let lines = vec![line(9000, 10000, Decimal::from(2))];
        let totals = CartTotals::compute(
            &lines,
            TaxRate::from_bps(1000),
            Money::from_cents(500),
            Money::zero(),
        );

        assert_eq!(totals.tax_amount.cents(), 2000);
        assert_eq!(totals.total_discount.cents(), 2500);
        assert_eq!(totals.grand_total.cents(), 19500);
    }

    #[test]
    fn test_shipping_added_to_grand_total() {
        let lines = vec![line(9000, 10000, Decimal::from(1))];
        let totals = CartTotals::compute(&lines, TaxRate::zero(), Money::zero(), Money::from_cents(250));
        assert_eq!(totals.grand_total.cents(), 9000 + 250);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let totals = CartTotals::compute(&[], TaxRate::from_bps(1000), Money::zero(), Money::zero());
        assert_eq!(totals, CartTotals::default());
    }

    #[test]
    fn test_fractional_quantities_round_per_line() {
        // 3.33 × 0.5 = 1.665 → 1.67 on each line
        let lines = vec![
            line(300, 333, Decimal::new(5, 1)),
            line(301, 333, Decimal::new(5, 1)),
        ];
        let totals = CartTotals::compute(&lines, TaxRate::zero(), Money::zero(), Money::zero());
        assert_eq!(totals.sub_total.cents(), 334);
        assert_eq!(totals.total_qty, Decimal::ONE);
    }
}
