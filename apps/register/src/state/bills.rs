//! # Bill Number Source
//!
//! Where a new bill's number comes from.
//!
//! ## Acquisition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mode = server                                                         │
//! │     GET /api/next-bill-number ── ok ──► (number, ServerIssued)         │
//! │              │                                                          │
//! │              └── failed / unusable ──► warn, fall through               │
//! │                                                                         │
//! │  mode = local (or fallback)                                            │
//! │     LocalBillSequence::next() ────────► (number, LocalFallback)        │
//! │       "INV-0041" → "INV-0042"                                          │
//! │       nothing usable yet → "BILL-<ms>-<rand>"                          │
//! │                                                                         │
//! │  After a commit: record_committed(number) advances the sequence.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use tillpoint_core::validation::validate_bill_number;
use tillpoint_core::{BillNumber, BillNumberOrigin, LocalBillSequence};
use tillpoint_remote::{Backend, BillNumberMode};

#[derive(Clone)]
pub struct BillNumberSource {
    mode: BillNumberMode,
    backend: Arc<dyn Backend>,
    sequence: Arc<Mutex<LocalBillSequence>>,
}

impl BillNumberSource {
    pub fn new(mode: BillNumberMode, backend: Arc<dyn Backend>, seed: Option<String>) -> Self {
        BillNumberSource {
            mode,
            backend,
            sequence: Arc::new(Mutex::new(LocalBillSequence::new(seed))),
        }
    }

    pub fn mode(&self) -> BillNumberMode {
        self.mode
    }

    /// Acquires a number for a new bill. Never fails.
    pub async fn next(&self) -> (BillNumber, BillNumberOrigin) {
        if self.mode == BillNumberMode::Server {
            match self.backend.next_bill_number().await {
                Ok(number) if validate_bill_number(&number).is_ok() => {
                    debug!(bill_number = %number, "Backend issued bill number");
                    return (BillNumber::new(number), BillNumberOrigin::ServerIssued);
                }
                Ok(number) => {
                    warn!(bill_number = %number, "Backend issued an unusable bill number, using local sequence");
                }
                Err(e) => {
                    warn!(error = %e, "Bill number unavailable, using local sequence");
                }
            }
        }

        let number = self.lock().next(Utc::now(), random_suffix());
        (number, BillNumberOrigin::LocalFallback)
    }

    /// Moves the local sequence past a committed bill.
    pub fn record_committed(&self, number: &BillNumber) {
        self.lock().advance_past(number);
    }

    pub fn last_committed(&self) -> Option<String> {
        self.lock().last().map(str::to_string)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LocalBillSequence> {
        self.sequence.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn random_suffix() -> u32 {
    Uuid::new_v4().as_u128() as u32
}
