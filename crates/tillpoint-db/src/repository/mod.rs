//! # Repository Module
//!
//! Database repository implementations for the side store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Register command                                                      │
//! │       │                                                                 │
//! │       │  db.held_sales().take("BILL-1700000000123")                    │
//! │       ▼                                                                 │
//! │  HeldSaleRepository                                                    │
//! │  ├── insert(&self, held)                                               │
//! │  ├── list(&self)                                                       │
//! │  ├── get(&self, id)                                                    │
//! │  ├── take(&self, id)      (read + delete, one transaction)             │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`held_sale::HeldSaleRepository`] - Parked carts

pub mod held_sale;
