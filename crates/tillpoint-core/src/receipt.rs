//! # Receipt Layout
//!
//! The fixed bill layout, built from a committed sale and rendered to plain
//! text for a roll printer.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               STORE NAME                 │  header
//! │             address, phone               │
//! ├──────────────────────────────────────────┤
//! │ Bill No / Date / Customer                │  bill info
//! ├──────────────────────────────────────────┤
//! │ Item                                     │  line items
//! │   qty x price (MRP)               total  │
//! ├──────────────────────────────────────────┤
//! │ Sub Total, discounts, tax, GRAND TOTAL   │  summary
//! │ Payment, received, change / owed         │
//! ├──────────────────────────────────────────┤
//! │ terms, footer                            │
//! └──────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::session::{CommittedSale, SaleSnapshot};
use crate::settlement::Settlement;
use crate::totals::CartTotals;
use crate::types::TaxRate;

/// Roll widths the renderer supports, in characters.
pub const PAPER_WIDTHS: [usize; 3] = [32, 42, 48];

// =============================================================================
// Store Info
// =============================================================================

/// Store details printed in the header and footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct StoreInfo {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: Option<String>,
    pub terms: Vec<String>,
    pub footer: Option<String>,
    pub currency_symbol: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        StoreInfo {
            name: "Tillpoint Store".to_string(),
            address_lines: Vec::new(),
            phone: None,
            terms: Vec::new(),
            footer: Some("Thank you for shopping with us".to_string()),
            currency_symbol: String::new(),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    #[ts(type = "number")]
    pub quantity: Decimal,
    pub mrp: Money,
    pub unit_price: Money,
    pub total: Money,
}

/// A bill ready to print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub store: StoreInfo,
    pub bill_number: String,
    pub sale_id: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub items: Vec<ReceiptItem>,
    pub totals: CartTotals,
    pub tax_rate: TaxRate,
    pub settlement: Settlement,
}

impl Receipt {
    /// Builds the receipt for a sale the backend accepted.
    pub fn from_committed(sale: &CommittedSale, store: &StoreInfo) -> Self {
        let mut receipt = Receipt::from_snapshot(&sale.sale, store);
        receipt.sale_id = Some(sale.sale_id.clone());
        receipt.date = sale.committed_at;
        receipt
    }

    /// Builds a receipt from a sale snapshot (preview, reprint).
    pub fn from_snapshot(sale: &SaleSnapshot, store: &StoreInfo) -> Self {
        let items = sale
            .cart
            .lines
            .iter()
            .map(|line| ReceiptItem {
                name: line.name.clone(),
                quantity: line.quantity,
                mrp: line.tiers.mrp,
                unit_price: line.unit_price,
                total: line.line_total(),
            })
            .collect();

        Receipt {
            store: store.clone(),
            bill_number: sale.bill_number.to_string(),
            sale_id: None,
            date: sale.created_at,
            customer_name: sale.customer.name.clone(),
            items,
            totals: sale.cart.totals,
            tax_rate: sale.cart.tax_rate,
            settlement: sale.settlement,
        }
    }

    /// Renders the receipt as plain text, `width` characters per line.
    pub fn render(&self, width: usize) -> String {
        let width = width.max(PAPER_WIDTHS[0]);
        let sym = self.store.currency_symbol.as_str();
        let amount = |m: Money| m.format_with(sym);
        let rule = "-".repeat(width);
        let mut out: Vec<String> = Vec::new();

        // header
        out.push(center(&self.store.name.to_uppercase(), width));
        for line in &self.store.address_lines {
            out.push(center(line, width));
        }
        if let Some(phone) = &self.store.phone {
            out.push(center(&format!("Ph: {}", phone), width));
        }
        out.push(rule.clone());

        // bill info
        out.push(fit(&format!("Bill No: {}", self.bill_number), width));
        out.push(fit(
            &format!("Date: {}", self.date.format("%Y-%m-%d %H:%M")),
            width,
        ));
        out.push(fit(&format!("Customer: {}", self.customer_name), width));
        out.push(rule.clone());

        // items
        out.push(columns("Item", "Total", width));
        for item in &self.items {
            out.push(fit(&item.name, width));
            let detail = format!(
                "  {} x {} (MRP {})",
                item.quantity.normalize(),
                amount(item.unit_price),
                amount(item.mrp)
            );
            out.push(columns(&detail, &amount(item.total), width));
        }
        out.push(rule.clone());

        // summary
        let t = &self.totals;
        out.push(columns("Sub Total (MRP)", &amount(t.sub_total), width));
        if !t.total_item_discount.is_zero() {
            out.push(columns("Item Discount", &amount(-t.total_item_discount), width));
        }
        if !t.bill_discount.is_zero() {
            out.push(columns("Bill Discount", &amount(-t.bill_discount), width));
        }
        if !t.tax_amount.is_zero() {
            let label = format!("Tax ({}%)", self.tax_rate.percentage().normalize());
            out.push(columns(&label, &amount(t.tax_amount), width));
        }
        if !t.shipping.is_zero() {
            out.push(columns("Shipping", &amount(t.shipping), width));
        }
        out.push(columns("GRAND TOTAL", &amount(t.grand_total), width));
        out.push(columns("Items / Qty", &format!("{} / {}", t.line_count, t.total_qty.normalize()), width));
        out.push(rule.clone());

        // payment
        let s = &self.settlement;
        out.push(columns("Payment", &s.payment_type.as_str().to_uppercase(), width));
        out.push(columns("Received", &amount(s.received), width));
        if s.payment_type.is_credit() {
            out.push(columns("Amount Owed", &amount(s.amount_owed()), width));
        } else {
            out.push(columns("Change", &amount(s.change()), width));
        }

        // terms and footer
        if !self.store.terms.is_empty() || self.store.footer.is_some() {
            out.push(rule);
        }
        for term in &self.store.terms {
            out.push(fit(term, width));
        }
        if let Some(footer) = &self.store.footer {
            out.push(center(footer, width));
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

// =============================================================================
// Layout helpers
// =============================================================================

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn fit(text: &str, width: usize) -> String {
    truncate(text, width)
}

fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let pad = (width - text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Left text and right-aligned value on one line; the left side gives way.
fn columns(left: &str, right: &str, width: usize) -> String {
    let right = truncate(right, width);
    let right_len = right.chars().count();
    let room = width.saturating_sub(right_len + 1);
    let left = truncate(left, room);
    let gap = width - left.chars().count() - right_len;
    format!("{}{}{}", left, " ".repeat(gap), right)
}

// =============================================================================
// Unit Tests
// =============================================================================
