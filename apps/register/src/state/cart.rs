//! # Cart State
//!
//! The register's one cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Every cart route may touch it
//! 2. Only one mutation may run at a time
//! 3. axum handlers run concurrently
//!
//! The lock is a plain `std::sync::Mutex`; it is never held across an
//! `.await`.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Screen Action            Route                     Cart Change         │
//! │  ─────────────            ─────                     ───────────         │
//! │                                                                         │
//! │  Pick Product ───────────► POST /cart/items ──────► add / merge        │
//! │                                                                         │
//! │  Edit Quantity ──────────► PUT /cart/items/{i} ───► update_quantity    │
//! │                                                                         │
//! │  Click Remove ───────────► POST .../removal ──────► request_removal    │
//! │  Confirm ────────────────► POST /cart/removal/... ► confirm / cancel   │
//! │                                                                         │
//! │  View Cart ──────────────► GET /cart ─────────────► (read only)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tillpoint_core::{Cart, SaleType};

#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new(sale_type: SaleType) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new(sale_type))),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        // a panic mid-mutation leaves a cart that is still structurally valid
        let cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add(&product, qty))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(SaleType::default())
    }
}
