//! # tillpoint-core: Pure Checkout Logic for Tillpoint
//!
//! This crate is the **heart** of Tillpoint. It contains the checkout engine
//! (cart, pricing, totals, bill session, settlement, receipt layout) as pure
//! code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillpoint Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    POS Screen (web UI)                          │   │
//! │  │    Search ──► Cart ──► Payment dialog ──► Bill print            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Register service (apps/register)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tillpoint-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │ catalog │ │ pricing │ │  cart   │ │ session  │ │ receipt │ │   │
//! │  │   │ search  │ │ tiers   │ │ totals  │ │ settle   │ │ layout  │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                 │                     │
//! │  ┌──────────────▼──────────────┐  ┌───────────────▼─────────────────┐  │
//! │  │ tillpoint-db (held sales)   │  │ tillpoint-remote (REST backend) │  │
//! │  └─────────────────────────────┘  └─────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SaleType, PaymentType, Customer)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`pricing`] - Unit price and discount per sale type
//! - [`catalog`] - In-memory product cache and search
//! - [`cart`] - Cart engine
//! - [`totals`] - Derived cart totals
//! - [`settlement`] - Balance and payment sufficiency
//! - [`bill_number`] - Bill numbers and the local sequence
//! - [`session`] - Bill session state machine
//! - [`held`] - Held (parked) sales
//! - [`receipt`] - Fixed bill layout
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tillpoint_core::{Cart, Money, Product, SaleType};
//!
//! let product = Product {
//!     id: "p-1".to_string(),
//!     name: "Basmati Rice 1kg".to_string(),
//!     item_code: Some("RICE-1".to_string()),
//!     barcode: None,
//!     sales_price: Money::from_cents(9000),
//!     wholesale_price: Money::from_cents(8500),
//!     mrp: Money::from_cents(10000),
//!     stock: Decimal::from(10),
//!     category: None,
//! };
//!
//! let mut cart = Cart::new(SaleType::Retail);
//! cart.add(&product, Decimal::from(2)).unwrap();
//!
//! let totals = cart.totals();
//! assert_eq!(totals.sub_total.cents(), 20000);
//! assert_eq!(totals.total_item_discount.cents(), 2000);
//! assert_eq!(totals.grand_total.cents(), 18000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill_number;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod held;
pub mod money;
pub mod pricing;
pub mod receipt;
pub mod session;
pub mod settlement;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill_number::{BillNumber, BillNumberOrigin, LocalBillSequence};
pub use cart::{Cart, CartLine, CartSnapshot};
pub use catalog::{Catalog, QueryGate, SearchFilter, SearchTicket};
pub use error::{CoreError, CoreResult, ValidationError};
pub use held::{HeldSale, HeldSaleSummary};
pub use money::Money;
pub use pricing::{price_for, PriceTiers, UnitPricing};
pub use receipt::{Receipt, ReceiptItem, StoreInfo, PAPER_WIDTHS};
pub use session::{BillSession, BillState, CommittedSale, SaleSnapshot, SessionView, SettleMode};
pub use settlement::Settlement;
pub use totals::CartTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customer name used when the operator does not attach a customer.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 200;

/// Maximum quantity of a single line.
///
/// Catches keying slips such as a barcode scanned into the quantity field.
pub const MAX_LINE_QUANTITY: i64 = 99_999;

/// Largest amount an operator or the backend may put on a bill
/// (one trillion major units).
///
/// Anything larger is a keying slip or a corrupt backend record.
pub const MAX_AMOUNT: Money = Money::from_cents(100_000_000_000_000);
