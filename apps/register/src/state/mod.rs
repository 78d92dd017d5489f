//! # State Module
//!
//! Manages register state.
//!
//! ## Why Multiple State Types?
//! Each state type guards one concern, so a catalog search never waits on a
//! cart mutation and a slow backend call never holds the cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                AppState (axum Router::with_state)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌─────────────┬─────────────┼─────────────┬─────────────┐          │
//! │     ▼             ▼             ▼             ▼             ▼           │
//! │  ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌───────────┐ ┌───────────┐     │
//! │  │CartState│ │Catalog    │ │Session  │ │BillNumber │ │Config     │     │
//! │  │Arc<Mutex│ │RwLock +   │ │State    │ │Source     │ │State      │     │
//! │  │<Cart>>  │ │QueryGate  │ │         │ │           │ │read-only  │     │
//! │  └─────────┘ └───────────┘ └─────────┘ └───────────┘ └───────────┘     │
//! │                                                                         │
//! │  plus: Database (held sales), Arc<dyn Backend>, Arc<dyn PrintSurface>  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Locks are std mutexes, never held across an .await                  │
//! │  • Lock order when nesting: session, then cart                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod bills;
mod cart;
mod catalog;
mod config;
mod session;

pub use bills::BillNumberSource;
pub use cart::CartState;
pub use catalog::CatalogState;
pub use config::ConfigState;
pub use session::SessionState;

use std::sync::Arc;

use tillpoint_db::Database;
use tillpoint_remote::{Backend, RegisterConfig};

use crate::print::PrintSurface;

/// Everything a command can reach. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub cart: CartState,
    pub catalog: CatalogState,
    pub session: SessionState,
    pub bill_numbers: BillNumberSource,
    pub config: ConfigState,
    pub db: Database,
    pub backend: Arc<dyn Backend>,
    pub printer: Arc<dyn PrintSurface>,
}

impl AppState {
    pub fn new(
        config: RegisterConfig,
        db: Database,
        backend: Arc<dyn Backend>,
        printer: Arc<dyn PrintSurface>,
    ) -> Self {
        let bill_numbers = BillNumberSource::new(
            config.register.bill_numbers,
            backend.clone(),
            config.register.bill_number_seed.clone(),
        );
        let config = ConfigState::new(config);

        AppState {
            cart: CartState::new(config.default_sale_type()),
            catalog: CatalogState::default(),
            session: SessionState::new(),
            bill_numbers,
            config,
            db,
            backend,
            printer,
        }
    }
}
