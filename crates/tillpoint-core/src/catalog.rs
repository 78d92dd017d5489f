//! # Catalog Cache
//!
//! Read-only, in-memory copy of the backend product list, loaded once per
//! register session and searched synchronously.
//!
//! ## Search Ranking
//! ```text
//! query "RICE"
//!   │
//!   ├── rank 0: item code or barcode equals the query     (RICE)
//!   ├── rank 1: item code or barcode starts with it       (RICE-1, RICE-5)
//!   └── rank 2: name contains it, case-insensitive        (Brown rice 5kg)
//!
//! Ties keep catalog order. Empty query → no results.
//! ```
//!
//! ## Latest Query Wins
//! Searches are debounced by the register. Each request takes a
//! [`SearchTicket`] from the [`QueryGate`]; when the debounce window ends, a
//! ticket that is no longer the latest is answered as superseded.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::PriceTiers;
use crate::types::Product;

// =============================================================================
// Search Filter
// =============================================================================

/// Optional narrowing applied after matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Exact category match, case-insensitive.
    pub category: Option<String>,
    /// Skip products whose cached stock is zero or below.
    #[serde(default)]
    pub in_stock_only: bool,
}

impl SearchFilter {
    fn accepts(&self, product: &Product) -> bool {
        if self.in_stock_only && !product.in_stock() {
            return false;
        }
        match (&self.category, &product.category) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The cached product set.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, loaded_at: DateTime<Utc>) -> Self {
        Catalog {
            products,
            loaded_at,
        }
    }

    /// A catalog with no products, used until the first load succeeds.
    pub fn empty() -> Self {
        Catalog::new(Vec::new(), DateTime::<Utc>::default())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks a product up by backend id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Searches the cached products.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    /// use tillpoint_core::{Catalog, Money, Product, SearchFilter};
    ///
    /// let rice = Product {
    ///     id: "p-1".to_string(),
    ///     name: "Basmati Rice".to_string(),
    ///     item_code: Some("RICE-1".to_string()),
    ///     barcode: None,
    ///     sales_price: Money::from_cents(9000),
    ///     wholesale_price: Money::from_cents(8500),
    ///     mrp: Money::from_cents(10000),
    ///     stock: Decimal::from(10),
    ///     category: None,
    /// };
    /// let catalog = Catalog::new(vec![rice], Utc::now());
    ///
    /// assert_eq!(catalog.search("rice", &SearchFilter::default(), 10).len(), 1);
    /// assert!(catalog.search("", &SearchFilter::default(), 10).is_empty());
    /// ```
    pub fn search(&self, query: &str, filter: &SearchFilter, limit: usize) -> Vec<&Product> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        let mut ranked: Vec<(u8, &Product)> = self
            .products
            .iter()
            .filter(|p| filter.accepts(p))
            .filter_map(|p| match_rank(p, &needle).map(|rank| (rank, p)))
            .collect();

        // stable: equal ranks keep catalog order
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked.into_iter().take(limit).map(|(_, p)| p).collect()
    }

    /// Products whose MRP sits below a price tier.
    pub fn price_anomalies(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| PriceTiers::of(p).is_anomalous())
            .collect()
    }

    /// Distinct categories, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.products.iter().filter_map(|p| p.category.as_deref()) {
            if !seen.iter().any(|c| c.eq_ignore_ascii_case(category)) {
                seen.push(category);
            }
        }
        seen
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::empty()
    }
}

fn match_rank(product: &Product, needle: &str) -> Option<u8> {
    let codes = [product.item_code.as_deref(), product.barcode.as_deref()];
    let codes = codes.iter().flatten().map(|c| c.to_lowercase());

    let mut best: Option<u8> = None;
    for code in codes {
        if code == needle {
            return Some(0);
        }
        if code.starts_with(needle) {
            best = Some(1);
        }
    }
    if best.is_some() {
        return best;
    }
    product.name.to_lowercase().contains(needle).then_some(2)
}

// =============================================================================
// Query Gate
// =============================================================================

/// A search request's place in line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing search tickets.
#[derive(Debug, Default)]
pub struct QueryGate {
    latest: AtomicU64,
}

impl QueryGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no later ticket has been issued.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rust_decimal::Decimal;

    fn product(id: &str, name: &str, code: Option<&str>, barcode: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            item_code: code.map(str::to_string),
            barcode: barcode.map(str::to_string),
            sales_price: Money::from_cents(1000),
            wholesale_price: Money::from_cents(900),
            mrp: Money::from_cents(1200),
            stock: Decimal::from(5),
            category: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                product("1", "Brown rice 5kg", Some("BR-5"), None),
                product("2", "Rice flour", Some("RICE-FL"), Some("890100")),
                product("3", "Basmati", Some("RICE"), Some("890200")),
                product("4", "Sugar", Some("SUG-1"), Some("890300")),
            ],
            Utc::now(),
        )
    }

    fn ids(results: &[&Product]) -> Vec<String> {
        results.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let c = catalog();
        assert!(c.search("", &SearchFilter::default(), 50).is_empty());
        assert!(c.search("   ", &SearchFilter::default(), 50).is_empty());
    }

    #[test]
    fn test_ranking_exact_then_prefix_then_name() {
        let c = catalog();
        let results = c.search("rice", &SearchFilter::default(), 50);
        assert_eq!(ids(&results), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_barcode_prefix_match() {
        let c = catalog();
        let results = c.search("8901", &SearchFilter::default(), 50);
        assert_eq!(ids(&results), vec!["2"]);
        let results = c.search("890", &SearchFilter::default(), 50);
        assert_eq!(ids(&results), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_limit_caps_results() {
        let c = catalog();
        let results = c.search("890", &SearchFilter::default(), 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_filter_in_stock_and_category() {
        let mut products = catalog().products().to_vec();
        products[0].stock = Decimal::ZERO;
        products[1].category = Some("Flour".to_string());
        let c = Catalog::new(products, Utc::now());

        let in_stock = SearchFilter {
            in_stock_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&c.search("rice", &in_stock, 50)), vec!["3", "2"]);

        let flour = SearchFilter {
            category: Some("flour".to_string()),
            in_stock_only: false,
        };
        assert_eq!(ids(&c.search("rice", &flour, 50)), vec!["2"]);
        assert_eq!(c.categories(), vec!["Flour"]);
    }

    #[test]
    fn test_get_and_anomalies() {
        let mut products = catalog().products().to_vec();
        products[3].mrp = Money::from_cents(500);
        let c = Catalog::new(products, Utc::now());

        assert_eq!(c.get("2").map(|p| p.name.as_str()), Some("Rice flour"));
        assert!(c.get("missing").is_none());
        assert_eq!(ids(&c.price_anomalies()), vec!["4"]);
    }

    #[test]
    fn test_query_gate_latest_wins() {
        let gate = QueryGate::new();
        let first = gate.issue();
        assert!(gate.is_current(first));

        let second = gate.issue();
        assert!(!gate.is_current(first));
        assert!(gate.is_current(second));
        assert!(second.sequence() > first.sequence());
    }
}
