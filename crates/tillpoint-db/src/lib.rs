//! # tillpoint-db: Local Side Store for Tillpoint
//!
//! SQLite storage for the data the register keeps to itself. The retail
//! backend owns products, customers and committed sales; the only thing kept
//! here is the list of held (parked) carts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillpoint Data Flow                              │
//! │                                                                         │
//! │  Register command (hold / resume / discard)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  tillpoint-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐  ┌──────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │  │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ HeldSaleRepo     │  │  (embedded)  │  │   │
//! │  │   └───────────────┘    └──────────────────┘  └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the platform data dir (register.db)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tillpoint_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("register.db")).await?;
//! db.held_sales().insert(&held).await?;
//! let parked = db.held_sales().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::held_sale::HeldSaleRepository;
