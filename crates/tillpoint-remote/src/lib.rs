//! # tillpoint-remote: Retail Backend Client
//!
//! The register's only road to the retail backend, plus the register's
//! configuration file.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Backend Calls                                    │
//! │                                                                         │
//! │  Register command                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn Backend>  ◄── BackendClient in production, fakes in tests     │
//! │       │                                                                 │
//! │       ├── fetch_catalog()      GET  /api/products                      │
//! │       ├── next_bill_number()   GET  /api/next-bill-number              │
//! │       ├── search_customers(q)  GET  /api/customers?search=q            │
//! │       └── commit_sale(sale)    POST /api/sales   (exactly once)        │
//! │                                                                         │
//! │  No call here retries on its own. Retries are the caller's decision,   │
//! │  and a sale commit is never retried.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;

pub use backend::Backend;
pub use client::{BackendClient, ClientConfig};
pub use config::{
    BackendSettings, BillNumberMode, PrinterKind, PrinterSettings, RegisterConfig,
    RegisterSettings,
};
pub use error::{RemoteError, RemoteResult};
