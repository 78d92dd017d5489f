//! # Bill Session
//!
//! The lifecycle of one bill, from Pay to committed sale.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──Pay──► AwaitingBillNumber ──number──► Editing ◄─────┐         │
//! │    ▲                                             │  ▲        │ edit    │
//! │    │                                         Save│  │edit    │         │
//! │    │                                             ▼  │        │         │
//! │    │ cancel (any state                 PendingConfirmation ──┘         │
//! │    │  before Settling)                           │    ▲                │
//! │    │                                  Print/Save │    │ commit failed  │
//! │    │                                             ▼    │                │
//! │    │                                          Settling                 │
//! │    │                                             │                     │
//! │    └──────────── reset ◄──── Committed ◄─────────┘ commit ok           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Generations
//! Every Pay and every cancel bumps a generation counter. A bill number that
//! arrives for an older generation is ignored, so a cancelled session never
//! picks up a late result.
//!
//! The session holds no locks and does no I/O. The register moves it into
//! AwaitingBillNumber or Settling under its lock, performs the network call
//! unlocked, then applies the result here.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bill_number::{BillNumber, BillNumberOrigin};
use crate::cart::CartSnapshot;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::settlement::{self, Settlement};
use crate::totals::CartTotals;
use crate::types::{Customer, PaymentType};
use crate::validation::{validate_amount, validate_bill_number};

// =============================================================================
// States
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BillState {
    #[default]
    Idle,
    AwaitingBillNumber,
    Editing,
    PendingConfirmation,
    Settling,
    Committed,
}

impl BillState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BillState::Idle => "idle",
            BillState::AwaitingBillNumber => "awaiting_bill_number",
            BillState::Editing => "editing",
            BillState::PendingConfirmation => "pending_confirmation",
            BillState::Settling => "settling",
            BillState::Committed => "committed",
        }
    }

    /// True while a bill is open on the payment screen.
    pub const fn is_active(&self) -> bool {
        !matches!(self, BillState::Idle | BillState::Committed)
    }
}

impl fmt::Display for BillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens after a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SettleMode {
    Print,
    JustSave,
}

// =============================================================================
// Snapshots
// =============================================================================

/// Everything committed for one bill. Immutable once Settling starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleSnapshot {
    pub bill_number: BillNumber,
    pub bill_number_origin: BillNumberOrigin,
    pub customer: Customer,
    pub settlement: Settlement,
    pub cart: CartSnapshot,
    pub mode: SettleMode,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A sale the backend accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommittedSale {
    pub sale_id: String,
    pub sale: SaleSnapshot,
    #[ts(as = "String")]
    pub committed_at: DateTime<Utc>,
}

/// What the payment screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub state: BillState,
    pub bill_number: Option<BillNumber>,
    pub bill_number_origin: Option<BillNumberOrigin>,
    pub customer: Customer,
    pub payment_type: PaymentType,
    pub received: Money,
    pub totals: Option<CartTotals>,
    pub balance: Option<Money>,
    pub last_error: Option<String>,
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct BillSession {
    state: BillState,
    generation: u64,
    bill_number: Option<BillNumber>,
    origin: Option<BillNumberOrigin>,
    pre_attempt_number: Option<BillNumber>,
    customer: Customer,
    payment_type: PaymentType,
    received: Money,
    cart: Option<CartSnapshot>,
    settlement: Option<Settlement>,
    last_error: Option<String>,
    committed: Option<CommittedSale>,
}

impl BillSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BillState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bill_number(&self) -> Option<&BillNumber> {
        self.bill_number.as_ref()
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn committed(&self) -> Option<&CommittedSale> {
        self.committed.as_ref()
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidTransition {
            state: self.state.to_string(),
            action: action.to_string(),
        }
    }

    fn grand_total(&self) -> Money {
        self.cart
            .as_ref()
            .map_or(Money::zero(), |c| c.totals.grand_total)
    }

    /// Clears everything except the generation counter.
    fn clear(&mut self) {
        let generation = self.generation;
        *self = BillSession {
            generation,
            ..BillSession::default()
        };
    }

    // -------------------------------------------------------------------------
    // Pay
    // -------------------------------------------------------------------------

    /// Opens a bill for the given cart. Returns the generation the bill
    /// number must be assigned under.
    pub fn begin_payment(&mut self, cart: CartSnapshot) -> CoreResult<u64> {
        if self.state.is_active() {
            return Err(self.invalid("pay"));
        }
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if cart.has_zero_quantity_lines() {
            return Err(CoreError::ZeroQuantityLines);
        }

        self.clear();
        self.generation += 1;
        self.cart = Some(cart);
        self.state = BillState::AwaitingBillNumber;
        Ok(self.generation)
    }

    /// Applies a fetched bill number. Returns `false` when the result is
    /// stale (cancelled or superseded session) and was dropped.
    pub fn assign_bill_number(
        &mut self,
        generation: u64,
        number: BillNumber,
        origin: BillNumberOrigin,
    ) -> bool {
        if generation != self.generation || self.state != BillState::AwaitingBillNumber {
            return false;
        }
        if validate_bill_number(number.as_str()).is_err() {
            return false;
        }
        self.bill_number = Some(number);
        self.origin = Some(origin);
        self.state = BillState::Editing;
        true
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Any edit after Save sends the bill back to Editing.
    fn begin_edit(&mut self, action: &str) -> CoreResult<()> {
        match self.state {
            BillState::Editing => Ok(()),
            BillState::PendingConfirmation => {
                self.state = BillState::Editing;
                self.settlement = None;
                Ok(())
            }
            _ => Err(self.invalid(action)),
        }
    }

    pub fn attach_customer(&mut self, customer: Customer) -> CoreResult<()> {
        self.begin_edit("attach customer")?;
        self.customer = customer;
        Ok(())
    }

    pub fn set_payment_type(&mut self, payment_type: PaymentType) -> CoreResult<()> {
        self.begin_edit("set payment type")?;
        self.payment_type = payment_type;
        Ok(())
    }

    pub fn set_received(&mut self, received: Money) -> CoreResult<()> {
        validate_amount("received amount", received)?;
        self.begin_edit("set received amount")?;
        self.received = received;
        Ok(())
    }

    /// Save: gates the bill on the settlement calculator.
    ///
    /// `InsufficientPayment` leaves the session in Editing.
    pub fn save(&mut self) -> CoreResult<Settlement> {
        if self.state != BillState::Editing {
            return Err(self.invalid("save"));
        }
        let settlement =
            Settlement::settle(self.payment_type, self.received, self.grand_total())?;
        self.settlement = Some(settlement);
        self.state = BillState::PendingConfirmation;
        Ok(settlement)
    }

    // -------------------------------------------------------------------------
    // Settling
    // -------------------------------------------------------------------------

    /// Print / Just Save: freezes the sale to commit.
    ///
    /// Only one commit may be in flight; a second call fails with
    /// `CommitInFlight` and must not reach the network.
    pub fn begin_settling(&mut self, mode: SettleMode, now: DateTime<Utc>) -> CoreResult<SaleSnapshot> {
        if self.state == BillState::Settling {
            return Err(CoreError::CommitInFlight {
                bill_number: self
                    .bill_number
                    .as_ref()
                    .map(|b| b.to_string())
                    .unwrap_or_default(),
            });
        }
        if self.state != BillState::PendingConfirmation {
            return Err(self.invalid("settle"));
        }

        let (Some(bill_number), Some(origin), Some(settlement), Some(cart)) = (
            self.bill_number.clone(),
            self.origin,
            self.settlement,
            self.cart.clone(),
        ) else {
            return Err(self.invalid("settle"));
        };

        self.pre_attempt_number = Some(bill_number.clone());
        self.last_error = None;
        self.state = BillState::Settling;

        Ok(SaleSnapshot {
            bill_number,
            bill_number_origin: origin,
            customer: self.customer.clone(),
            settlement,
            cart,
            mode,
            created_at: now,
        })
    }

    /// The backend accepted the sale.
    pub fn commit_succeeded(
        &mut self,
        sale: SaleSnapshot,
        sale_id: String,
        now: DateTime<Utc>,
    ) -> CoreResult<CommittedSale> {
        if self.state != BillState::Settling {
            return Err(self.invalid("complete commit"));
        }
        let committed = CommittedSale {
            sale_id,
            sale,
            committed_at: now,
        };
        self.committed = Some(committed.clone());
        self.pre_attempt_number = None;
        self.state = BillState::Committed;
        Ok(committed)
    }

    /// The commit failed. Back to PendingConfirmation with the bill number
    /// it had before the attempt; the cart is untouched.
    pub fn commit_failed(&mut self, reason: impl Into<String>) -> CoreResult<()> {
        if self.state != BillState::Settling {
            return Err(self.invalid("fail commit"));
        }
        if let Some(number) = self.pre_attempt_number.take() {
            self.bill_number = Some(number);
        }
        self.last_error = Some(reason.into());
        self.state = BillState::PendingConfirmation;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Exit
    // -------------------------------------------------------------------------

    /// Abandons the bill. Not allowed while a commit is in flight.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if self.state == BillState::Settling {
            return Err(self.invalid("cancel"));
        }
        self.clear();
        self.generation += 1;
        Ok(())
    }

    /// Returns to Idle after a committed bill.
    pub fn reset(&mut self) {
        self.clear();
        self.generation += 1;
    }

    pub fn view(&self) -> SessionView {
        let totals = self.cart.as_ref().map(|c| c.totals);
        SessionView {
            state: self.state,
            bill_number: self.bill_number.clone(),
            bill_number_origin: self.origin,
            customer: self.customer.clone(),
            payment_type: self.payment_type,
            received: self.received,
            balance: totals.map(|t| settlement::balance(self.received, t.grand_total)),
            totals,
            last_error: self.last_error.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
