//! # Session State
//!
//! The open bill, if any.
//!
//! ## Lock Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. lock → transition (begin_payment / begin_settling) → unlock        │
//! │  2. network call, no lock held                                         │
//! │  3. lock → apply result (generation checked) → unlock                  │
//! │                                                                         │
//! │  When both are needed, the session lock is taken before the cart lock. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tillpoint_core::BillSession;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Arc<Mutex<BillSession>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BillSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        f(&session)
    }

    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut BillSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut session)
    }
}
