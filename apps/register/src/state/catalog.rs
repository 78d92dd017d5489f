//! # Catalog State
//!
//! The cached product list and the gate that orders search requests.
//!
//! Reads vastly outnumber the occasional reload, so the catalog sits behind
//! an `RwLock`; a reload swaps the whole catalog at once.

use std::sync::{Arc, RwLock};

use tillpoint_core::{Catalog, Product, QueryGate, SearchTicket};

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    catalog: Arc<RwLock<Catalog>>,
    gate: Arc<QueryGate>,
}

impl CatalogState {
    pub fn new(catalog: Catalog) -> Self {
        CatalogState {
            catalog: Arc::new(RwLock::new(catalog)),
            gate: Arc::new(QueryGate::new()),
        }
    }

    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Catalog) -> R,
    {
        let catalog = self.catalog.read().unwrap_or_else(|e| e.into_inner());
        f(&catalog)
    }

    /// Replaces the cached catalog.
    pub fn replace(&self, catalog: Catalog) {
        let mut current = self.catalog.write().unwrap_or_else(|e| e.into_inner());
        *current = catalog;
    }

    /// A copy of one product, for adding to the cart.
    pub fn product(&self, id: &str) -> Option<Product> {
        self.with_catalog(|c| c.get(id).cloned())
    }

    pub fn issue_ticket(&self) -> SearchTicket {
        self.gate.issue()
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.gate.is_current(ticket)
    }
}
