//! # Commands Module
//!
//! Register commands: plain async functions over [`AppState`](crate::state::AppState)
//! returning `Result<T, ApiError>`. The routes in [`crate::routes`] are thin
//! wrappers around them, and tests call them directly.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Register Commands                               │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌─────────────────┐ │
//! │  │  Catalog            │  │  Cart               │  │  Checkout       │ │
//! │  │                     │  │                     │  │                 │ │
//! │  │  • load_catalog     │  │  • get_cart         │  │  • begin        │ │
//! │  │  • search           │  │  • add_item         │  │  • set_customer │ │
//! │  │    (debounced)      │  │  • set_quantity     │  │  • set_payment  │ │
//! │  │                     │  │  • request/confirm/ │  │  • save         │ │
//! │  │                     │  │    cancel removal   │  │  • settle       │ │
//! │  │                     │  │  • sale type, adj.  │  │  • cancel       │ │
//! │  │                     │  │  • reset            │  │                 │ │
//! │  └─────────────────────┘  └─────────────────────┘  └─────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐                      │
//! │  │  Customers          │  │  Held Sales         │                      │
//! │  │  • search           │  │  • list / hold      │                      │
//! │  │                     │  │  • resume / discard │                      │
//! │  └─────────────────────┘  └─────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod held;

use tillpoint_core::{Cart, CoreResult};

use crate::error::ApiError;
use crate::state::AppState;

/// Runs a cart edit, refusing it while a bill is open.
///
/// The session lock is held for the whole edit so Pay cannot snapshot the
/// cart halfway through.
pub(crate) fn edit_cart<F, R>(state: &AppState, f: F) -> Result<R, ApiError>
where
    F: FnOnce(&mut Cart) -> CoreResult<R>,
{
    state.session.with_session(|session| {
        let bill_state = session.state();
        if bill_state.is_active() {
            return Err(ApiError::session(format!(
                "Cart is locked while bill session is {}",
                bill_state
            )));
        }
        state.cart.with_cart_mut(f).map_err(ApiError::from)
    })
}
