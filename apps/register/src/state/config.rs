//! # Configuration State
//!
//! Register configuration loaded at startup.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::sync::Arc;
use std::time::Duration;

use tillpoint_core::{Money, SaleType, StoreInfo};
use tillpoint_remote::RegisterConfig;

#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    config: Arc<RegisterConfig>,
}

impl ConfigState {
    pub fn new(config: RegisterConfig) -> Self {
        ConfigState {
            config: Arc::new(config),
        }
    }

    pub fn get(&self) -> &RegisterConfig {
        &self.config
    }

    pub fn store(&self) -> &StoreInfo {
        &self.config.store
    }

    pub fn default_sale_type(&self) -> SaleType {
        self.config.register.default_sale_type
    }

    pub fn search_debounce(&self) -> Duration {
        self.config.search_debounce()
    }

    pub fn search_limit(&self) -> usize {
        self.config.register.search_limit
    }

    pub fn paper_width(&self) -> usize {
        self.config.printer.paper_width
    }

    /// Formats an amount with the store's currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // currency_symbol = "Rs."
    /// assert_eq!(config.format_money(Money::from_cents(1234)), "Rs.12.34");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with(&self.config.store.currency_symbol)
    }
}
