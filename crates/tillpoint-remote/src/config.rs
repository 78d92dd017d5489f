//! # Register Configuration
//!
//! Configuration for one register: which backend it talks to, what the
//! receipt says, and how the register service and printer behave.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILLPOINT_BACKEND_URL=https://shop.example.com                     │
//! │     TILLPOINT_BILL_NUMBERS=local                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tillpoint/register.toml (Linux)                          │
//! │     ~/Library/Application Support/com.tillpoint.register/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     local backend on :8000, server-issued bill numbers, log printer    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [backend]
//! base_url = "https://shop.example.com"
//! api_token = "secret"
//! request_timeout_secs = 10
//!
//! [store]
//! name = "Corner Mart"
//! address_lines = ["12 Market Road"]
//! terms = ["Goods once sold will not be taken back"]
//!
//! [register]
//! bind_addr = "127.0.0.1:7070"
//! default_sale_type = "retail"
//! bill_numbers = "server"
//!
//! [printer]
//! kind = "spool"
//! spool_dir = "/var/spool/tillpoint"
//! paper_width = 42
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use tillpoint_core::{SaleType, StoreInfo, PAPER_WIDTHS};

use crate::client::ClientConfig;
use crate::error::{RemoteError, RemoteResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// Where the retail backend lives and how patient to be with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as a bearer token when set.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Total time spent retrying the startup catalog load (seconds).
    #[serde(default = "default_catalog_load_max")]
    pub catalog_load_max_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_catalog_load_max() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            base_url: default_base_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout(),
            catalog_load_max_secs: default_catalog_load_max(),
        }
    }
}

// =============================================================================
// Register Settings
// =============================================================================

/// Where bill numbers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillNumberMode {
    /// Ask the backend; fall back to the local sequence when it fails.
    #[default]
    Server,

    /// Never ask; count locally from the seed.
    Local,
}

impl std::str::FromStr for BillNumberMode {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" | "remote" => Ok(BillNumberMode::Server),
            "local" | "offline" => Ok(BillNumberMode::Local),
            other => Err(RemoteError::InvalidConfig(format!(
                "Unknown bill number mode: '{}'. Valid options: server, local",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSettings {
    /// Address the register service listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Sale type of every fresh cart.
    #[serde(default)]
    pub default_sale_type: SaleType,

    #[serde(default)]
    pub bill_numbers: BillNumberMode,

    /// Last bill number printed before this register took over.
    #[serde(default)]
    pub bill_number_seed: Option<String>,

    /// Quiet period before a search runs (milliseconds).
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,

    /// Maximum search results returned to the screen.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// SQLite file for held sales. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:7070".to_string()
}

fn default_search_debounce() -> u64 {
    250
}

fn default_search_limit() -> usize {
    50
}

impl Default for RegisterSettings {
    fn default() -> Self {
        RegisterSettings {
            bind_addr: default_bind_addr(),
            default_sale_type: SaleType::default(),
            bill_numbers: BillNumberMode::default(),
            bill_number_seed: None,
            search_debounce_ms: default_search_debounce(),
            search_limit: default_search_limit(),
            database_path: None,
        }
    }
}

// =============================================================================
// Printer Settings
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterKind {
    /// Write each receipt as a text file into a spool directory.
    Spool,

    /// Emit receipts to the log only (development).
    #[default]
    Log,
}

impl std::str::FromStr for PrinterKind {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spool" => Ok(PrinterKind::Spool),
            "log" => Ok(PrinterKind::Log),
            other => Err(RemoteError::InvalidConfig(format!(
                "Unknown printer kind: '{}'. Valid options: spool, log",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterSettings {
    #[serde(default)]
    pub kind: PrinterKind,

    #[serde(default)]
    pub spool_dir: Option<PathBuf>,

    /// Characters per line (32, 42 or 48).
    #[serde(default = "default_paper_width")]
    pub paper_width: usize,
}

fn default_paper_width() -> usize {
    42
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            kind: PrinterKind::default(),
            spool_dir: None,
            paper_width: default_paper_width(),
        }
    }
}

// =============================================================================
// Main Register Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    /// Receipt header and footer.
    #[serde(default)]
    pub store: StoreInfo,

    #[serde(default)]
    pub register: RegisterSettings,

    #[serde(default)]
    pub printer: PrinterSettings,
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (register.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RemoteResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with<F>(config_path: Option<PathBuf>, env: F) -> RemoteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> RemoteResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RemoteError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RemoteError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| RemoteError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Register config saved");
        Ok(())
    }

    pub fn validate(&self) -> RemoteResult<()> {
        let url = Url::parse(&self.backend.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RemoteError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.base_url
            )));
        }

        if self.backend.request_timeout_secs == 0 {
            return Err(RemoteError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.register.search_limit == 0 {
            return Err(RemoteError::InvalidConfig(
                "search_limit must be greater than 0".into(),
            ));
        }

        if !PAPER_WIDTHS.contains(&self.printer.paper_width) {
            return Err(RemoteError::InvalidConfig(format!(
                "paper_width must be one of {:?}, got {}",
                PAPER_WIDTHS, self.printer.paper_width
            )));
        }

        if self.printer.kind == PrinterKind::Spool && self.printer.spool_dir.is_none() {
            return Err(RemoteError::InvalidConfig(
                "spool printer needs spool_dir".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, env: F) -> RemoteResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env("TILLPOINT_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.base_url = url;
        }

        if let Some(token) = env("TILLPOINT_API_TOKEN") {
            self.backend.api_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Some(timeout) = env("TILLPOINT_REQUEST_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.backend.request_timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric request timeout"),
            }
        }

        if let Some(addr) = env("TILLPOINT_BIND_ADDR") {
            self.register.bind_addr = addr;
        }

        if let Some(sale_type) = env("TILLPOINT_SALE_TYPE") {
            self.register.default_sale_type = sale_type
                .parse()
                .map_err(RemoteError::InvalidConfig)?;
        }

        if let Some(mode) = env("TILLPOINT_BILL_NUMBERS") {
            debug!(mode = %mode, "Overriding bill number mode from environment");
            self.register.bill_numbers = mode.parse()?;
        }

        if let Some(seed) = env("TILLPOINT_BILL_NUMBER_SEED") {
            self.register.bill_number_seed = Some(seed);
        }

        if let Some(path) = env("TILLPOINT_DATABASE_PATH") {
            self.register.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = env("TILLPOINT_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(kind) = env("TILLPOINT_PRINTER") {
            self.printer.kind = kind.parse()?;
        }

        if let Some(dir) = env("TILLPOINT_SPOOL_DIR") {
            self.printer.spool_dir = Some(PathBuf::from(dir));
        }

        if let Some(width) = env("TILLPOINT_PAPER_WIDTH") {
            match width.parse::<usize>() {
                Ok(w) => self.printer.paper_width = w,
                Err(_) => warn!(value = %width, "Ignoring non-numeric paper width"),
            }
        }

        Ok(())
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "tillpoint", "register")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("register.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Settings for [`BackendClient`](crate::BackendClient).
    pub fn client_config(&self) -> RemoteResult<ClientConfig> {
        Ok(ClientConfig::new(&self.backend.base_url)?
            .with_token(self.backend.api_token.clone())
            .with_timeout(Duration::from_secs(self.backend.request_timeout_secs)))
    }

    /// The held-sale database file, falling back to the platform data
    /// directory and finally the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.register.database_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("register.db"))
                .unwrap_or_else(|| PathBuf::from("register.db"))
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.register.search_debounce_ms)
    }

    pub fn catalog_load_budget(&self) -> Duration {
        Duration::from_secs(self.backend.catalog_load_max_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn missing_file() -> Option<PathBuf> {
        Some(PathBuf::from("/nonexistent/tillpoint/register.toml"))
    }

    #[test]
    fn test_default_config() {
        let config = RegisterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.register.bill_numbers, BillNumberMode::Server);
        assert_eq!(config.printer.kind, PrinterKind::Log);
        assert_eq!(config.printer.paper_width, 42);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: RegisterConfig = toml::from_str(
            r#"
            [backend]
            base_url = "https://shop.example.com"

            [store]
            name = "Corner Mart"

            [register]
            default_sale_type = "wholesale"
            bill_numbers = "local"
            bill_number_seed = "INV-0041"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://shop.example.com");
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.store.name, "Corner Mart");
        assert_eq!(config.register.default_sale_type, SaleType::Wholesale);
        assert_eq!(config.register.bill_numbers, BillNumberMode::Local);
        assert_eq!(config.register.bill_number_seed.as_deref(), Some("INV-0041"));
        assert_eq!(config.register.search_limit, 50);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = RegisterConfig::load_with(
            missing_file(),
            env_of(&[
                ("TILLPOINT_BACKEND_URL", "https://api.example.com"),
                ("TILLPOINT_API_TOKEN", "t0ken"),
                ("TILLPOINT_BILL_NUMBERS", "local"),
                ("TILLPOINT_SALE_TYPE", "wholesale"),
                ("TILLPOINT_PAPER_WIDTH", "32"),
            ]),
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://api.example.com");
        assert_eq!(config.backend.api_token.as_deref(), Some("t0ken"));
        assert_eq!(config.register.bill_numbers, BillNumberMode::Local);
        assert_eq!(config.register.default_sale_type, SaleType::Wholesale);
        assert_eq!(config.printer.paper_width, 32);
    }

    #[test]
    fn test_bad_env_values_rejected() {
        let result = RegisterConfig::load_with(
            missing_file(),
            env_of(&[("TILLPOINT_BILL_NUMBERS", "sometimes")]),
        );
        assert!(matches!(result, Err(RemoteError::InvalidConfig(_))));

        let result = RegisterConfig::load_with(
            missing_file(),
            env_of(&[("TILLPOINT_BACKEND_URL", "ftp://files.example.com")]),
        );
        assert!(matches!(result, Err(RemoteError::InvalidUrl(_))));
    }

    #[test]
    fn test_config_validation() {
        let mut config = RegisterConfig::default();

        config.backend.request_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.backend.request_timeout_secs = 5;

        config.printer.paper_width = 40;
        assert!(config.validate().is_err());
        config.printer.paper_width = 48;

        config.printer.kind = PrinterKind::Spool;
        assert!(config.validate().is_err());
        config.printer.spool_dir = Some(PathBuf::from("/tmp/spool"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config() {
        let mut config = RegisterConfig::default();
        config.backend.request_timeout_secs = 3;
        let client = config.client_config().unwrap();
        assert_eq!(client.request_timeout, Duration::from_secs(3));
        assert_eq!(client.base_url.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn test_toml_serialization() {
        let config = RegisterConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[backend]"));
        assert!(toml_str.contains("[printer]"));

        let back: RegisterConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.register.bind_addr, config.register.bind_addr);
    }
}
