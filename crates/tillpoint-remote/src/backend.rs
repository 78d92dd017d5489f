//! # Backend Trait
//!
//! The seam between the register and the retail backend. The register holds
//! an `Arc<dyn Backend>`; tests swap in in-memory fakes.

use async_trait::async_trait;

use tillpoint_core::{Customer, Product, SaleSnapshot};

use crate::error::RemoteResult;

#[async_trait]
pub trait Backend: Send + Sync {
    /// The full product list.
    async fn fetch_catalog(&self) -> RemoteResult<Vec<Product>>;

    /// The next bill number the backend would issue.
    async fn next_bill_number(&self) -> RemoteResult<String>;

    async fn search_customers(&self, query: &str) -> RemoteResult<Vec<Customer>>;

    /// Persists a sale and returns its backend id.
    ///
    /// Called once per settle; implementations must not retry.
    async fn commit_sale(&self, sale: &SaleSnapshot) -> RemoteResult<String>;
}
