//! Fakes shared by the register's unit tests.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tillpoint_core::{Catalog, Customer, Money, Product, SaleSnapshot};
use tillpoint_db::{Database, DbConfig};
use tillpoint_remote::{Backend, RegisterConfig, RemoteError, RemoteResult};

use crate::print::{PrintError, PrintSurface};
use crate::state::AppState;

pub fn product(id: &str, name: &str, sales: i64, wholesale: i64, mrp: i64, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        item_code: Some(id.to_uppercase()),
        barcode: None,
        sales_price: Money::from_cents(sales),
        wholesale_price: Money::from_cents(wholesale),
        mrp: Money::from_cents(mrp),
        stock: Decimal::from(stock),
        category: None,
    }
}

/// Rice: 90.00 retail, 85.00 wholesale, 100.00 MRP, 10 in stock.
pub fn rice() -> Product {
    product("rice", "Basmati Rice", 9000, 8500, 10000, 10)
}

/// Tea: 5.00 retail, 4.50 wholesale, 6.00 MRP, 3 in stock.
pub fn tea() -> Product {
    product("tea", "Ceylon Tea", 500, 450, 600, 3)
}

// =============================================================================
// Fake Backend
// =============================================================================

#[derive(Default)]
pub struct FakeBackend {
    products: Vec<Product>,
    customers: Vec<Customer>,
    next_number: Option<String>,
    commit_delay: Duration,
    fail_commits: AtomicBool,
    catalog_failures_left: AtomicUsize,
    bill_number_requests: AtomicUsize,
    commits: AtomicUsize,
    committed: Mutex<Vec<SaleSnapshot>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_customers(mut self, customers: Vec<Customer>) -> Self {
        self.customers = customers;
        self
    }

    /// Without this, bill number requests fail.
    pub fn with_next_number(mut self, number: &str) -> Self {
        self.next_number = Some(number.to_string());
        self
    }

    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = delay;
        self
    }

    /// The first `n` catalog fetches fail with a timeout.
    pub fn with_catalog_failures(self, n: usize) -> Self {
        self.catalog_failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn commit_calls(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn bill_number_requests(&self) -> usize {
        self.bill_number_requests.load(Ordering::SeqCst)
    }

    pub fn committed(&self) -> Vec<SaleSnapshot> {
        self.committed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_catalog(&self) -> RemoteResult<Vec<Product>> {
        let left = self.catalog_failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.catalog_failures_left.store(left - 1, Ordering::SeqCst);
            return Err(RemoteError::Timeout(10));
        }
        Ok(self.products.clone())
    }

    async fn next_bill_number(&self) -> RemoteResult<String> {
        self.bill_number_requests.fetch_add(1, Ordering::SeqCst);
        self.next_number
            .clone()
            .ok_or_else(|| RemoteError::ConnectionFailed("refused".to_string()))
    }

    async fn search_customers(&self, query: &str) -> RemoteResult<Vec<Customer>> {
        let needle = query.to_lowercase();
        Ok(self
            .customers
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn commit_sale(&self, sale: &SaleSnapshot) -> RemoteResult<String> {
        let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.commit_delay.is_zero() {
            tokio::time::sleep(self.commit_delay).await;
        }
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(RemoteError::Api {
                status: 500,
                message: "database down".to_string(),
            });
        }
        self.committed.lock().unwrap().push(sale.clone());
        Ok(format!("sale-{}", n))
    }
}

// =============================================================================
// Recording Printer
// =============================================================================

#[derive(Default)]
pub struct RecordingPrinter {
    pub fail: AtomicBool,
    pub printed: Mutex<Vec<(String, String)>>,
}

impl RecordingPrinter {
    pub fn printed(&self) -> Vec<(String, String)> {
        self.printed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrintSurface for RecordingPrinter {
    async fn print(&self, bill_number: &str, text: &str) -> Result<(), PrintError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PrintError::Unavailable("paper out".to_string()));
        }
        self.printed
            .lock()
            .unwrap()
            .push((bill_number.to_string(), text.to_string()));
        Ok(())
    }
}

// =============================================================================
// App State
// =============================================================================

pub struct Harness {
    pub state: AppState,
    pub backend: Arc<FakeBackend>,
    pub printer: Arc<RecordingPrinter>,
}

/// App state over an in-memory side store, with the backend's products
/// already in the catalog.
pub async fn harness(backend: FakeBackend) -> Harness {
    harness_with_config(backend, RegisterConfig::default()).await
}

pub async fn harness_with_config(backend: FakeBackend, config: RegisterConfig) -> Harness {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let backend = Arc::new(backend);
    let printer = Arc::new(RecordingPrinter::default());

    let state = AppState::new(config, db, backend.clone(), printer.clone());
    let products = backend.fetch_catalog().await.unwrap_or_default();
    state.catalog.replace(Catalog::new(products, Utc::now()));

    Harness {
        state,
        backend,
        printer,
    }
}
