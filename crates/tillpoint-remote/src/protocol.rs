//! # Wire Protocol
//!
//! Shapes of the retail backend's REST payloads.
//!
//! ## Leniency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inbound decoding rules                               │
//! │                                                                         │
//! │  "sales_price": 12.5       → 12.50                                     │
//! │  "sales_price": "12.5"     → 12.50                                     │
//! │  "sales_price": null / ""  → 0.00                                      │
//! │  (field missing)           → 0.00                                      │
//! │  price < 0 / > MAX_AMOUNT  → clamped into 0..=MAX_AMOUNT               │
//! │  "id": 17                  → "17"                                      │
//! │  record without an id      → skipped (warn)                            │
//! │                                                                         │
//! │  One malformed product never fails the whole catalog.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Outbound amounts are decimal major units serialized as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use tillpoint_core::{Customer, Money, PaymentType, Product, SaleSnapshot, MAX_AMOUNT};

// =============================================================================
// Envelopes
// =============================================================================

/// `{ "data": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// `GET /api/next-bill-number`
#[derive(Debug, Clone, Deserialize)]
pub struct NextBillNumberResponse {
    #[serde(default, alias = "nextBillNumber")]
    pub next_bill_number: Value,
}

impl NextBillNumberResponse {
    pub fn number(&self) -> Option<String> {
        lenient_text(&self.next_bill_number)
    }
}

// =============================================================================
// Inbound Records
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default, alias = "itemCode")]
    pub item_code: Value,
    #[serde(default)]
    pub barcode: Value,
    #[serde(default, alias = "salesPrice")]
    pub sales_price: Value,
    #[serde(default, alias = "wholesalePrice")]
    pub wholesale_price: Value,
    #[serde(default)]
    pub mrp: Value,
    #[serde(default)]
    pub stock: Value,
    #[serde(default, alias = "category_name")]
    pub category: Value,
}

impl ProductRecord {
    /// `None` when the record has no usable id.
    pub fn into_product(self) -> Option<Product> {
        let id = lenient_text(&self.id)?;
        let item_code = lenient_text(&self.item_code);
        let name = lenient_text(&self.name)
            .or_else(|| item_code.clone())
            .unwrap_or_else(|| id.clone());

        Some(Product {
            id,
            name,
            item_code,
            barcode: lenient_text(&self.barcode),
            sales_price: wire_price(&self.sales_price),
            wholesale_price: wire_price(&self.wholesale_price),
            mrp: wire_price(&self.mrp),
            stock: lenient_decimal(&self.stock),
            category: category_name(&self.category),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default, alias = "mobile")]
    pub phone: Value,
}

impl CustomerRecord {
    /// `None` without an id or a name.
    pub fn into_customer(self) -> Option<Customer> {
        Some(Customer {
            id: Some(lenient_text(&self.id)?),
            name: lenient_text(&self.name)?,
            phone: lenient_text(&self.phone),
        })
    }
}

// =============================================================================
// Commit
// =============================================================================

/// `POST /api/sales` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitSaleRequest {
    pub bill_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub sale_type: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub payment_type: PaymentType,
    pub received_amount: Decimal,
    pub balance_amount: Decimal,
    pub items: Vec<CommitSaleItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitSaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: Decimal,
    pub mrp: Decimal,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl CommitSaleRequest {
    pub fn from_snapshot(sale: &SaleSnapshot) -> Self {
        let totals = &sale.cart.totals;
        CommitSaleRequest {
            bill_number: sale.bill_number.to_string(),
            customer_id: sale.customer.id.clone(),
            customer_name: sale.customer.name.clone(),
            sale_type: sale.cart.sale_type.to_string(),
            subtotal: totals.sub_total.to_decimal(),
            discount: totals.total_discount.to_decimal(),
            tax: totals.tax_amount.to_decimal(),
            shipping: totals.shipping.to_decimal(),
            total: totals.grand_total.to_decimal(),
            payment_type: sale.settlement.payment_type,
            received_amount: sale.settlement.received.to_decimal(),
            balance_amount: sale.settlement.balance.to_decimal(),
            items: sale
                .cart
                .lines
                .iter()
                .map(|line| CommitSaleItem {
                    product_id: line.product_id.clone(),
                    product_name: line.name.clone(),
                    quantity: line.quantity,
                    mrp: line.tiers.mrp.to_decimal(),
                    unit_price: line.unit_price.to_decimal(),
                    discount: line.unit_discount.to_decimal(),
                    total: line.line_total().to_decimal(),
                })
                .collect(),
        }
    }
}

/// Finds the new sale's id in whatever the backend sent back.
///
/// Looks at `id`, then `sale_id`, then the same two under `data`.
pub fn extract_sale_id(body: &Value) -> Option<String> {
    let direct = |v: &Value| {
        lenient_text(v.get("id").unwrap_or(&Value::Null))
            .or_else(|| lenient_text(v.get("sale_id").unwrap_or(&Value::Null)))
    };
    direct(body).or_else(|| body.get("data").and_then(direct))
}

// =============================================================================
// Lenient Scalars
// =============================================================================

/// Numbers and numeric strings become decimals; anything else is zero.
pub fn lenient_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .unwrap_or(Decimal::ZERO)
        }
        Value::String(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// A lenient price held to the range a bill can carry.
fn wire_price(value: &Value) -> Money {
    Money::from_decimal(lenient_decimal(value)).clamp(Money::zero(), MAX_AMOUNT)
}

/// Non-empty strings and numbers as text.
pub fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Categories arrive as a name or as `{ "name": ... }`.
fn category_name(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.get("name").and_then(lenient_text),
        other => lenient_text(other),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
