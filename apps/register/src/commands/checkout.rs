//! # Checkout Commands
//!
//! The payment screen: Pay, edit, Save, then Print or Just Save.
//!
//! ## Settle Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  settle(mode)                                                          │
//! │     │                                                                   │
//! │     ├─ lock session ─► begin_settling ─► SaleSnapshot ─► unlock        │
//! │     │                   (second caller gets CommitInFlight here and    │
//! │     │                    never reaches the network)                    │
//! │     │                                                                   │
//! │     ├─ POST /api/sales (no lock held, never retried)                   │
//! │     │                                                                   │
//! │     ├─ ok:  lock ─► commit_succeeded ─► reset cart + session ─► unlock │
//! │     │       advance local sequence, print if asked (best effort)       │
//! │     │                                                                   │
//! │     └─ err: lock ─► commit_failed ─► PendingConfirmation ─► unlock     │
//! │             cart untouched, operator may retry                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use tillpoint_core::{
    BillNumber, Customer, Money, PaymentType, Receipt, SessionView, SettleMode, Settlement,
};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// `null` or a missing customer means walk-in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerRequest {
    #[serde(default)]
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_type: Option<PaymentType>,
    /// Major units.
    pub received: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettleRequest {
    pub mode: SettleMode,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    pub sale_id: String,
    pub bill_number: BillNumber,
    pub settlement: Settlement,
    /// The rendered receipt, printed or not.
    pub receipt: String,
    /// Set when the receipt could not be printed. The sale is saved either way.
    pub print_notice: Option<String>,
}

// =============================================================================
// Commands
// =============================================================================

pub fn get_checkout(state: &AppState) -> SessionView {
    state.session.with_session(|s| s.view())
}

/// Pay: opens a bill for the current cart and acquires its number.
pub async fn begin_checkout(state: &AppState) -> Result<SessionView, ApiError> {
    let generation = state.session.with_session_mut(|session| {
        let snapshot = state.cart.with_cart(|cart| cart.snapshot());
        session.begin_payment(snapshot)
    })?;
    debug!(generation, "Bill opened, acquiring number");

    let (number, origin) = state.bill_numbers.next().await;

    let view = state.session.with_session_mut(|session| {
        if session.assign_bill_number(generation, number.clone(), origin) {
            info!(bill_number = %number, ?origin, "Bill number assigned");
        } else {
            debug!(bill_number = %number, generation, "Late bill number dropped");
        }
        session.view()
    });
    Ok(view)
}

pub fn set_customer(state: &AppState, request: CustomerRequest) -> Result<SessionView, ApiError> {
    let customer = request.customer.unwrap_or_default();
    let view = state.session.with_session_mut(|session| {
        session.attach_customer(customer)?;
        Ok::<_, ApiError>(session.view())
    })?;
    Ok(view)
}

pub fn set_payment(state: &AppState, request: PaymentRequest) -> Result<SessionView, ApiError> {
    let view = state.session.with_session_mut(|session| {
        if let Some(payment_type) = request.payment_type {
            session.set_payment_type(payment_type)?;
        }
        if let Some(received) = request.received {
            session.set_received(Money::from_decimal(received))?;
        }
        Ok::<_, ApiError>(session.view())
    })?;
    Ok(view)
}

/// Save: checks the payment covers the bill.
pub fn save(state: &AppState) -> Result<SessionView, ApiError> {
    state.session.with_session_mut(|session| {
        let settlement = session.save()?;
        debug!(
            payment_type = %settlement.payment_type,
            balance = settlement.balance.cents(),
            "Bill saved, awaiting confirmation"
        );
        Ok(session.view())
    })
}

pub fn cancel(state: &AppState) -> Result<SessionView, ApiError> {
    let view = state.session.with_session_mut(|session| {
        session.cancel()?;
        Ok::<_, ApiError>(session.view())
    })?;
    info!("Bill cancelled");
    Ok(view)
}

/// Print / Just Save: commits the sale exactly once.
pub async fn settle(state: &AppState, request: SettleRequest) -> Result<SettleResponse, ApiError> {
    let sale = state
        .session
        .with_session_mut(|session| session.begin_settling(request.mode, Utc::now()))?;
    info!(bill_number = %sale.bill_number, mode = ?request.mode, "Committing sale");

    let sale_id = match state.backend.commit_sale(&sale).await {
        Ok(id) => id,
        Err(e) => {
            error!(bill_number = %sale.bill_number, error = %e, "Sale commit failed");
            state
                .session
                .with_session_mut(|session| session.commit_failed(e.to_string()))?;
            return Err(ApiError::commit_failed(&e));
        }
    };

    let default_sale_type = state.config.default_sale_type();
    let committed = state.session.with_session_mut(|session| {
        let committed = session.commit_succeeded(sale, sale_id, Utc::now())?;
        state.cart.with_cart_mut(|cart| cart.reset(default_sale_type));
        session.reset();
        Ok::<_, ApiError>(committed)
    })?;
    state.bill_numbers.record_committed(&committed.sale.bill_number);
    info!(
        bill_number = %committed.sale.bill_number,
        sale_id = %committed.sale_id,
        "Sale committed"
    );

    let receipt = Receipt::from_committed(&committed, state.config.store())
        .render(state.config.paper_width());

    let mut print_notice = None;
    if request.mode == SettleMode::Print {
        if let Err(e) = state
            .printer
            .print(committed.sale.bill_number.as_str(), &receipt)
            .await
        {
            warn!(bill_number = %committed.sale.bill_number, error = %e, "Receipt not printed");
            print_notice = Some(e.to_string());
        }
    }

    Ok(SettleResponse {
        sale_id: committed.sale_id,
        bill_number: committed.sale.bill_number,
        settlement: committed.sale.settlement,
        receipt,
        print_notice,
    })
}
