//! # Held Sales
//!
//! A cart parked so the operator can serve someone else, then resumed.
//!
//! ```text
//!   hold ──► HeldSale { saleId: "BILL-<epoch-ms>", products, totals, ... }
//!              │
//!              ▼  (side store)
//!   resume ──► CartSnapshot ──► Cart::restore (cart must be empty)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartLine, CartSnapshot};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::totals::CartTotals;
use crate::types::{SaleType, TaxRate};

/// A parked cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeldSale {
    pub sale_id: String,
    pub products: Vec<CartLine>,
    pub totals: CartTotals,
    pub tax: TaxRate,
    pub bill_discount: Money,
    pub shipping: Money,
    pub sale_type: SaleType,
    #[ts(as = "String")]
    pub held_at: DateTime<Utc>,
}

impl HeldSale {
    /// Parks a cart. Empty carts cannot be held.
    pub fn hold(cart: &Cart, now: DateTime<Utc>) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let snapshot = cart.snapshot();
        Ok(HeldSale {
            sale_id: format!("BILL-{}", now.timestamp_millis()),
            products: snapshot.lines,
            totals: snapshot.totals,
            tax: snapshot.tax_rate,
            bill_discount: snapshot.bill_discount,
            shipping: snapshot.shipping,
            sale_type: snapshot.sale_type,
            held_at: now,
        })
    }

    /// Whether `cart` still holds exactly what was parked.
    pub fn matches(&self, cart: &Cart) -> bool {
        cart.lines() == self.products.as_slice()
            && cart.sale_type() == self.sale_type
            && cart.tax_rate() == self.tax
            && cart.bill_discount() == self.bill_discount
            && cart.shipping() == self.shipping
    }

    /// The cart to restore. Totals are derived again from the lines.
    pub fn into_snapshot(self) -> CartSnapshot {
        let totals = CartTotals::compute(&self.products, self.tax, self.bill_discount, self.shipping);
        CartSnapshot {
            lines: self.products,
            sale_type: self.sale_type,
            tax_rate: self.tax,
            bill_discount: self.bill_discount,
            shipping: self.shipping,
            totals,
        }
    }

    pub fn summary(&self) -> HeldSaleSummary {
        HeldSaleSummary {
            sale_id: self.sale_id.clone(),
            line_count: self.products.len(),
            grand_total: self.totals.grand_total,
            held_at: self.held_at,
        }
    }
}

/// A row of the held-sales list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeldSaleSummary {
    pub sale_id: String,
    pub line_count: usize,
    pub grand_total: Money,
    #[ts(as = "String")]
    pub held_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
