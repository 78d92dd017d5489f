//! # Cart Engine
//!
//! The ordered list of lines being sold, plus bill-level adjustments.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Method             State Change          │
//! │  ───────────────          ───────────             ────────────          │
//! │                                                                         │
//! │  Pick search result ────► add() ────────────────► merge by product id  │
//! │                                                   or append a line      │
//! │                                                                         │
//! │  Type quantity ─────────► update_quantity() ────► lines[i].qty = n     │
//! │                                                                         │
//! │  Click remove ──────────► request_removal() ────► pending = Some(i)    │
//! │  Confirm / cancel ──────► confirm_removal() ────► lines.remove(i)      │
//! │                           cancel_removal() ─────► pending = None       │
//! │                                                                         │
//! │  Switch retail/whsl ────► set_sale_type() ──────► re-price every line  │
//! │                                                                         │
//! │  NOTE: every mutation except request_removal clears a pending removal.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id
//! - `line_total = quantity × unit_price` on every path
//! - A line's cumulative quantity never exceeds the stock figure it was
//!   last priced against (the figure is advisory; the backend owns stock)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::PriceTiers;
use crate::totals::CartTotals;
use crate::types::{Product, SaleType, TaxRate};
use crate::validation::{
    parse_quantity_input, validate_amount, validate_line_quantity, validate_quantity,
    validate_tax_percent,
};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// ## Design Notes
/// The product fields are a snapshot taken when the line was added (or last
/// merged into), so the line prices consistently even if the catalog is
/// reloaded underneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub item_code: Option<String>,
    pub tiers: PriceTiers,
    /// Stock figure at the time of the last add or merge.
    #[ts(type = "number")]
    pub stock_ceiling: Decimal,
    #[ts(type = "number")]
    pub quantity: Decimal,
    pub unit_price: Money,
    pub unit_discount: Money,
}

impl CartLine {
    /// Creates a line priced at the given sale type.
    pub fn from_product(product: &Product, quantity: Decimal, sale_type: SaleType) -> Self {
        let tiers = PriceTiers::of(product);
        let pricing = tiers.unit_pricing(sale_type);
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            item_code: product.item_code.clone(),
            tiers,
            stock_ceiling: product.stock,
            quantity,
            unit_price: pricing.unit_price,
            unit_discount: pricing.unit_discount,
        }
    }

    /// Refreshes the product snapshot from a newer copy of the product.
    fn refresh(&mut self, product: &Product, sale_type: SaleType) {
        self.name = product.name.clone();
        self.item_code = product.item_code.clone();
        self.tiers = PriceTiers::of(product);
        self.stock_ceiling = product.stock;
        self.reprice(sale_type);
    }

    /// Recomputes unit price and discount for a sale type.
    pub fn reprice(&mut self, sale_type: SaleType) {
        let pricing = self.tiers.unit_pricing(sale_type);
        self.unit_price = pricing.unit_price;
        self.unit_discount = pricing.unit_discount;
    }

    /// Quantity × unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.times_quantity(self.quantity)
    }

    /// Quantity × MRP.
    #[inline]
    pub fn mrp_total(&self) -> Money {
        self.tiers.mrp.times_quantity(self.quantity)
    }

    /// Quantity × per-unit discount.
    #[inline]
    pub fn discount_total(&self) -> Money {
        self.unit_discount.times_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// An immutable copy of a cart with its totals.
///
/// Handed to the bill session at Pay, persisted for held sales, and rendered
/// on the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub sale_type: SaleType,
    pub tax_rate: TaxRate,
    pub bill_discount: Money,
    pub shipping: Money,
    pub totals: CartTotals,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_zero_quantity_lines(&self) -> bool {
        self.lines.iter().any(|l| l.quantity.is_zero())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart being rung up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    sale_type: SaleType,
    tax_rate: TaxRate,
    bill_discount: Money,
    shipping: Money,
    pending_removal: Option<usize>,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new(sale_type: SaleType) -> Self {
        Cart {
            lines: Vec::new(),
            sale_type,
            tax_rate: TaxRate::zero(),
            bill_discount: Money::zero(),
            shipping: Money::zero(),
            pending_removal: None,
            created_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    /// Adds a product, merging into its existing line if present.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity accumulates, snapshot and pricing
    ///   are refreshed from `product`
    /// - Product not in cart: a new line is appended
    /// - Cumulative quantity above `product.stock`: `InsufficientStock`, cart
    ///   unchanged
    ///
    /// ## Returns
    /// The index of the affected line.
    pub fn add(&mut self, product: &Product, quantity: Decimal) -> CoreResult<usize> {
        validate_quantity(quantity).map_err(|e| CoreError::InvalidQuantity {
            reason: e.to_string(),
        })?;

        let existing = self.lines.iter().position(|l| l.product_id == product.id);
        let current = existing.map_or(Decimal::ZERO, |i| self.lines[i].quantity);
        let cumulative = current + quantity;

        if cumulative > Decimal::from(MAX_LINE_QUANTITY) {
            return Err(CoreError::QuantityTooLarge {
                requested: cumulative,
                max: MAX_LINE_QUANTITY,
            });
        }
        if !product.can_sell(cumulative) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: cumulative,
            });
        }

        let index = match existing {
            Some(index) => {
                let line = &mut self.lines[index];
                line.refresh(product, self.sale_type);
                line.quantity = cumulative;
                index
            }
            None => {
                if self.lines.len() >= MAX_CART_LINES {
                    return Err(CoreError::CartTooLarge {
                        max: MAX_CART_LINES,
                    });
                }
                self.lines
                    .push(CartLine::from_product(product, quantity, self.sale_type));
                self.lines.len() - 1
            }
        };

        self.pending_removal = None;
        Ok(index)
    }

    /// Sets a line's quantity. Zero keeps the line in the cart.
    ///
    /// Increases are checked against the line's stock ceiling.
    pub fn update_quantity(&mut self, index: usize, quantity: Decimal) -> CoreResult<()> {
        validate_line_quantity(quantity)?;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineNotFound(index))?;

        if quantity > line.quantity && quantity > line.stock_ceiling {
            return Err(CoreError::InsufficientStock {
                product: line.name.clone(),
                available: line.stock_ceiling,
                requested: quantity,
            });
        }

        line.quantity = quantity;
        self.pending_removal = None;
        Ok(())
    }

    /// Sets a line's quantity from raw field input.
    ///
    /// Blank or non-numeric input sets the quantity to zero.
    pub fn update_quantity_input(&mut self, index: usize, input: &str) -> CoreResult<()> {
        self.update_quantity(index, parse_quantity_input(input))
    }

    /// First step of a removal: remembers which line to remove.
    pub fn request_removal(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound(index));
        }
        self.pending_removal = Some(index);
        Ok(())
    }

    /// Removes the line named by the pending request.
    pub fn confirm_removal(&mut self) -> CoreResult<CartLine> {
        let index = self
            .pending_removal
            .take()
            .ok_or(CoreError::NoPendingRemoval)?;
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound(index));
        }
        Ok(self.lines.remove(index))
    }

    /// Drops a pending removal. Returns whether one was pending.
    pub fn cancel_removal(&mut self) -> bool {
        self.pending_removal.take().is_some()
    }

    // -------------------------------------------------------------------------
    // Bill-level settings
    // -------------------------------------------------------------------------

    /// Switches the price tier and re-prices every line. Quantities stay.
    pub fn set_sale_type(&mut self, sale_type: SaleType) {
        self.sale_type = sale_type;
        for line in &mut self.lines {
            line.reprice(sale_type);
        }
        self.pending_removal = None;
    }

    pub fn set_tax_percent(&mut self, pct: Decimal) -> CoreResult<()> {
        validate_tax_percent(pct)?;
        self.tax_rate = TaxRate::from_percentage(pct);
        self.pending_removal = None;
        Ok(())
    }

    pub fn set_bill_discount(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("bill discount", amount)?;
        self.bill_discount = amount;
        self.pending_removal = None;
        Ok(())
    }

    pub fn set_shipping(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("shipping", amount)?;
        self.shipping = amount;
        self.pending_removal = None;
        Ok(())
    }

    /// Empties the cart and restores every bill-level setting.
    pub fn reset(&mut self, sale_type: SaleType) {
        *self = Cart::new(sale_type);
    }

    /// Loads a held cart into this one. The cart must be empty.
    pub fn restore(&mut self, snapshot: CartSnapshot) -> CoreResult<()> {
        if !self.is_empty() {
            return Err(CoreError::CartNotEmpty);
        }
        let CartSnapshot {
            lines,
            sale_type,
            tax_rate,
            bill_discount,
            shipping,
            ..
        } = snapshot;

        self.lines = lines;
        self.sale_type = sale_type;
        self.tax_rate = tax_rate;
        self.bill_discount = bill_discount;
        self.shipping = shipping;
        self.pending_removal = None;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&CartLine> {
        self.lines.get(index)
    }

    pub fn sale_type(&self) -> SaleType {
        self.sale_type
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn bill_discount(&self) -> Money {
        self.bill_discount
    }

    pub fn shipping(&self) -> Money {
        self.shipping
    }

    pub fn pending_removal(&self) -> Option<usize> {
        self.pending_removal
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_zero_quantity_lines(&self) -> bool {
        self.lines.iter().any(|l| l.quantity.is_zero())
    }

    /// Derives the current totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(
            &self.lines,
            self.tax_rate,
            self.bill_discount,
            self.shipping,
        )
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            sale_type: self.sale_type,
            tax_rate: self.tax_rate,
            bill_discount: self.bill_discount,
            shipping: self.shipping,
            totals: self.totals(),
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new(SaleType::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn test_product(id: &str, sales: i64, wholesale: i64, mrp: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            item_code: Some(format!("CODE-{}", id)),
            barcode: None,
            sales_price: Money::from_cents(sales),
            wholesale_price: Money::from_cents(wholesale),
            mrp: Money::from_cents(mrp),
            stock: Decimal::from(stock),
            category: None,
        }
    }

    fn qty(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_scenario_a_line_pricing() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", 9000, 8500, 10000, 10), qty(2)).unwrap();

        let line = &cart.lines()[0];
        assert_eq!(line.unit_discount.cents(), 1000);
        assert_eq!(line.line_total().cents(), 18000);

        let totals = cart.totals();
        assert_eq!(totals.sub_total.cents(), 20000);
        assert_eq!(totals.total_item_discount.cents(), 2000);
    }

    #[test]
    fn test_scenario_b_adjustments() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", 9000, 8500, 10000, 10), qty(2)).unwrap();
        cart.set_tax_percent(Decimal::from(10)).unwrap();
        cart.set_bill_discount(Money::from_cents(500)).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.tax_amount.cents(), 2000);
        assert_eq!(totals.total_discount.cents(), 2500);
        assert_eq!(totals.grand_total.cents(), 19500);
    }

    #[test]
    fn test_scenario_e_stock_guard_leaves_cart_empty() {
        let mut cart = Cart::new(SaleType::Retail);
        let err = cart
            .add(&test_product("x", 9000, 8500, 10000, 3), qty(5))
            .unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_checks_cumulative_stock() {
        let mut cart = Cart::new(SaleType::Retail);
        let product = test_product("x", 9000, 8500, 10000, 4);
        cart.add(&product, qty(3)).unwrap();

        let err = cart.add(&product, qty(2)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(cart.lines()[0].quantity, qty(3));
    }

    #[test]
    fn test_merge_refreshes_snapshot() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", 9000, 8500, 10000, 10), qty(1)).unwrap();

        let repriced = test_product("x", 9500, 8500, 10000, 10);
        let index = cart.add(&repriced, qty(1)).unwrap();

        assert_eq!(index, 0);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].unit_price.cents(), 9500);
        assert_eq!(cart.lines()[0].line_total().cents(), 19000);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new(SaleType::Retail);
        let product = test_product("x", 9000, 8500, 10000, 10);
        assert!(matches!(
            cart.add(&product, Decimal::ZERO),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert!(cart.add(&product, qty(-1)).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_too_large() {
        let mut cart = Cart::new(SaleType::Retail);
        for i in 0..MAX_CART_LINES {
            cart.add(&test_product(&i.to_string(), 100, 90, 120, 10), qty(1))
                .unwrap();
        }
        let err = cart
            .add(&test_product("overflow", 100, 90, 120, 10), qty(1))
            .unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
    }

    #[test]
    fn test_update_quantity_zero_keeps_line() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", 9000, 8500, 10000, 10), qty(2)).unwrap();

        cart.update_quantity_input(0, "").unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert!(cart.lines()[0].quantity.is_zero());
        assert!(cart.has_zero_quantity_lines());
        assert!(cart.totals().grand_total.is_zero());
    }

    #[test]
    fn test_update_quantity_checks_ceiling_on_increase_only() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", 9000, 8500, 10000, 5), qty(5)).unwrap();

        assert!(matches!(
            cart.update_quantity(0, qty(6)),
            Err(CoreError::InsufficientStock { .. })
        ));

        cart.update_quantity(0, qty(4)).unwrap();
        assert_eq!(cart.lines()[0].quantity, qty(4));

        assert!(matches!(
            cart.update_quantity(3, qty(1)),
            Err(CoreError::LineNotFound(3))
        ));
    }

    #[test]
    fn test_two_step_removal() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("a", 100, 90, 120, 10), qty(1)).unwrap();
        cart.add(&test_product("b", 200, 190, 220, 10), qty(1)).unwrap();

        cart.request_removal(0).unwrap();
        assert_eq!(cart.pending_removal(), Some(0));
        assert!(cart.cancel_removal());
        assert_eq!(cart.lines().len(), 2);

        cart.request_removal(0).unwrap();
        let removed = cart.confirm_removal().unwrap();
        assert_eq!(removed.product_id, "a");
        assert_eq!(cart.lines()[0].product_id, "b");

        assert!(matches!(cart.confirm_removal(), Err(CoreError::NoPendingRemoval)));
        assert!(matches!(cart.request_removal(5), Err(CoreError::LineNotFound(5))));
    }

    #[test]
    fn test_other_mutation_clears_pending_removal() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("a", 100, 90, 120, 10), qty(1)).unwrap();
        cart.request_removal(0).unwrap();

        cart.update_quantity(0, qty(2)).unwrap();
        assert_eq!(cart.pending_removal(), None);
        assert!(matches!(cart.confirm_removal(), Err(CoreError::NoPendingRemoval)));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_sale_type_reprices_lines() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", 9000, 8500, 10000, 10), qty(2)).unwrap();

        cart.set_sale_type(SaleType::Wholesale);
        let line = &cart.lines()[0];
        assert_eq!(line.quantity, qty(2));
        assert_eq!(line.unit_price.cents(), 8500);
        assert_eq!(line.unit_discount.cents(), 1500);
        assert_eq!(line.line_total().cents(), 17000);

        // lines added after the switch price at wholesale too
        cart.add(&test_product("y", 1000, 800, 1200, 10), qty(1)).unwrap();
        assert_eq!(cart.lines()[1].unit_price.cents(), 800);
    }

    #[test]
    fn test_adjustments_validate() {
        let mut cart = Cart::new(SaleType::Retail);
        assert!(cart.set_tax_percent(Decimal::from(101)).is_err());
        assert!(cart.set_bill_discount(Money::from_cents(-1)).is_err());
        assert!(cart.set_shipping(Money::from_cents(-1)).is_err());
        cart.set_shipping(Money::from_cents(300)).unwrap();
        assert_eq!(cart.shipping().cents(), 300);
    }

    #[test]
    fn test_oversized_amounts_are_rejected_and_totals_survive() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", 9000, 8500, 10000, 10), qty(1)).unwrap();

        // 1e17 major units, past what i64 cents can hold
        let huge = Money::from_decimal(Decimal::from(10i64.pow(17)));
        assert!(cart.set_bill_discount(huge).is_err());
        assert!(cart.set_shipping(huge).is_err());
        assert!(cart.set_shipping(crate::MAX_AMOUNT + Money::from_cents(1)).is_err());
        assert!(cart.bill_discount().is_zero());
        assert_eq!(cart.totals().grand_total.cents(), 9000);

        cart.set_shipping(crate::MAX_AMOUNT).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.grand_total, crate::MAX_AMOUNT + Money::from_cents(9000));
    }

    #[test]
    fn test_totals_saturate_on_corrupt_prices() {
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&test_product("x", i64::MAX, i64::MAX, i64::MAX, 10), qty(3)).unwrap();
        cart.add(&test_product("y", i64::MAX, i64::MAX, i64::MAX, 10), qty(1)).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.sub_total.cents(), i64::MAX);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut cart = Cart::new(SaleType::Wholesale);
        cart.add(&test_product("x", 9000, 8500, 10000, 10), qty(2)).unwrap();
        cart.set_tax_percent(Decimal::from(5)).unwrap();
        cart.set_shipping(Money::from_cents(100)).unwrap();

        cart.reset(SaleType::Retail);
        assert!(cart.is_empty());
        assert_eq!(cart.sale_type(), SaleType::Retail);
        assert!(cart.tax_rate().is_zero());
        assert!(cart.shipping().is_zero());
    }

    #[test]
    fn test_restore_requires_empty_cart() {
        let mut source = Cart::new(SaleType::Wholesale);
        source.add(&test_product("x", 9000, 8500, 10000, 10), qty(2)).unwrap();
        source.set_bill_discount(Money::from_cents(500)).unwrap();
        let snapshot = source.snapshot();

        let mut busy = Cart::new(SaleType::Retail);
        busy.add(&test_product("y", 100, 90, 120, 10), qty(1)).unwrap();
        assert!(matches!(
            busy.restore(snapshot.clone()),
            Err(CoreError::CartNotEmpty)
        ));

        let mut empty = Cart::new(SaleType::Retail);
        empty.restore(snapshot.clone()).unwrap();
        assert_eq!(empty.sale_type(), SaleType::Wholesale);
        assert_eq!(empty.totals(), snapshot.totals);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::tests::test_product;
    use super::*;
    use proptest::prelude::*;

    fn quantity() -> impl Strategy<Value = Decimal> {
        // up to two decimal places, 0.01 ..= 50.00
        (1i64..=5000).prop_map(|hundredths| Decimal::new(hundredths, 2))
    }

    fn prices() -> impl Strategy<Value = (i64, i64, i64)> {
        (0i64..50_000, 0i64..50_000, 0i64..60_000)
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn merge_accumulates_into_one_line(
            (sales, wholesale, mrp) in prices(),
            q1 in quantity(),
            q2 in quantity(),
        ) {
            let product = test_product("a", sales, wholesale, mrp, 1000);
            let mut cart = Cart::new(SaleType::Retail);
            cart.add(&product, q1).unwrap();
            cart.add(&product, q2).unwrap();

            prop_assert_eq!(cart.lines().len(), 1);
            let line = &cart.lines()[0];
            prop_assert_eq!(line.quantity, q1 + q2);
            prop_assert_eq!(line.line_total(), line.unit_price.times_quantity(q1 + q2));
        }

        #[test]
        fn sale_type_switch_reprices_without_touching_quantities(
            items in prop::collection::vec((prices(), quantity()), 1..8),
        ) {
            let mut cart = Cart::new(SaleType::Retail);
            for (i, ((sales, wholesale, mrp), q)) in items.iter().enumerate() {
                cart.add(&test_product(&i.to_string(), *sales, *wholesale, *mrp, 1000), *q).unwrap();
            }
            let before: Vec<Decimal> = cart.lines().iter().map(|l| l.quantity).collect();

            cart.set_sale_type(SaleType::Wholesale);

            for (line, qty) in cart.lines().iter().zip(before) {
                let expected = line.tiers.unit_pricing(SaleType::Wholesale);
                prop_assert_eq!(line.quantity, qty);
                prop_assert_eq!(line.unit_price, line.tiers.wholesale_price);
                prop_assert_eq!(line.unit_discount, expected.unit_discount);
                prop_assert_eq!(line.line_total(), line.tiers.wholesale_price.times_quantity(qty));
            }
        }

        #[test]
        fn grand_total_identity_holds(
            items in prop::collection::vec((prices(), quantity()), 0..8),
            tax_bps in 0u32..=10_000,
            bill_discount in 0i64..10_000,
            wholesale in any::<bool>(),
        ) {
            let mut cart = Cart::new(SaleType::Retail);
            for (i, ((sales, whsl, mrp), q)) in items.iter().enumerate() {
                cart.add(&test_product(&i.to_string(), *sales, *whsl, *mrp, 1000), *q).unwrap();
            }
            cart.set_tax_percent(TaxRate::from_bps(tax_bps).percentage()).unwrap();
            cart.set_bill_discount(Money::from_cents(bill_discount)).unwrap();
            if wholesale {
                cart.set_sale_type(SaleType::Wholesale);
            }

            let t = cart.totals();
            let sub_total: Money = cart.lines().iter().map(CartLine::mrp_total).sum();
            prop_assert_eq!(t.sub_total, sub_total);
            prop_assert_eq!(t.total_discount, t.total_item_discount + t.bill_discount);
            prop_assert_eq!(t.grand_total, t.sub_total + t.tax_amount - t.total_discount + t.shipping);
        }
    }
}
