//! # Held Sale Commands
//!
//! Parking a cart to serve the next customer, then picking it back up.
//!
//! ```text
//! hold:    cart ──► HeldSale ──► side store ──► cart reset
//!                                      │
//!                    cart edited since ─┴─► row dropped, cart kept
//! resume:  side store ──take──► HeldSale ──► empty cart restored
//!                                   │
//!                                   └─ restore refused ──► put back
//! ```

use chrono::Utc;
use tracing::{info, warn};

use tillpoint_core::{CoreError, HeldSale, HeldSaleSummary};

use super::cart::CartResponse;
use super::edit_cart;
use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

pub async fn list_held(state: &AppState) -> Result<Vec<HeldSaleSummary>, ApiError> {
    Ok(state.db.held_sales().list().await?)
}

/// Parks the current cart. The cart is only cleared once the held sale is
/// stored, and only if it was not edited while the store was busy.
pub async fn hold_current(state: &AppState) -> Result<HeldSaleSummary, ApiError> {
    let held = edit_cart(state, |cart| HeldSale::hold(cart, Utc::now()))?;

    state.db.held_sales().insert(&held).await?;

    let sale_type = state.config.default_sale_type();
    let cleared = edit_cart(state, |cart| {
        if !held.matches(cart) {
            return Ok(false);
        }
        cart.reset(sale_type);
        Ok(true)
    });

    match cleared {
        Ok(true) => {}
        outcome => {
            if let Err(e) = state.db.held_sales().delete(&held.sale_id).await {
                warn!(id = %held.sale_id, error = %e, "Could not drop stale held sale");
            }
            let err = match outcome {
                Err(e) => e,
                _ => ApiError::new(ErrorCode::CartError, "Cart changed while it was being held"),
            };
            warn!(id = %held.sale_id, error = %err.message, "Hold abandoned");
            return Err(err);
        }
    }

    let summary = held.summary();
    info!(id = %summary.sale_id, lines = summary.line_count, "Sale held");
    Ok(summary)
}

/// Brings a held sale back into the (empty) cart.
pub async fn resume(state: &AppState, id: &str) -> Result<CartResponse, ApiError> {
    edit_cart(state, |cart| {
        if cart.is_empty() {
            Ok(())
        } else {
            Err(CoreError::CartNotEmpty)
        }
    })?;

    let held = state.db.held_sales().take(id).await?;

    let restored = edit_cart(state, |cart| {
        cart.restore(held.clone().into_snapshot())?;
        Ok(CartResponse::of(cart))
    });

    match restored {
        Ok(cart) => {
            info!(id = %id, lines = cart.lines.len(), "Held sale resumed");
            Ok(cart)
        }
        Err(e) => {
            // the cart changed while the sale was being read back
            if let Err(put_back) = state.db.held_sales().insert(&held).await {
                warn!(id = %id, error = %put_back, "Could not put held sale back");
            }
            Err(e)
        }
    }
}

pub async fn discard(state: &AppState, id: &str) -> Result<(), ApiError> {
    state.db.held_sales().delete(id).await?;
    info!(id = %id, "Held sale discarded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_item, get_cart, set_adjustments, AddItemRequest, AdjustmentsRequest};
    use crate::test_support::{harness, rice, tea, FakeBackend};
    use rust_decimal::Decimal;
    use tillpoint_core::Money;

    fn add(product_id: &str, quantity: i64) -> AddItemRequest {
        AddItemRequest {
            product_id: product_id.to_string(),
            quantity: Decimal::from(quantity),
        }
    }

    #[tokio::test]
    async fn test_hold_and_resume_round_trip() {
        let h = harness(FakeBackend::new().with_products(vec![rice(), tea()])).await;
        add_item(&h.state, add("rice", 2)).unwrap();
        add_item(&h.state, add("tea", 1)).unwrap();
        set_adjustments(
            &h.state,
            AdjustmentsRequest {
                shipping: Some(Decimal::from(3)),
                ..Default::default()
            },
        )
        .unwrap();
        let before = get_cart(&h.state);

        let summary = hold_current(&h.state).await.unwrap();
        assert_eq!(summary.line_count, 2);
        assert!(get_cart(&h.state).lines.is_empty());
        assert_eq!(list_held(&h.state).await.unwrap().len(), 1);

        let cart = resume(&h.state, &summary.sale_id).await.unwrap();
        assert_eq!(cart.lines, before.lines);
        assert_eq!(cart.shipping, Money::from_cents(300));
        assert_eq!(cart.totals, before.totals);
        assert!(list_held(&h.state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hold_empty_cart() {
        let h = harness(FakeBackend::new()).await;
        let err = hold_current(&h.state).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_resume_needs_empty_cart() {
        let h = harness(FakeBackend::new().with_products(vec![rice(), tea()])).await;
        add_item(&h.state, add("rice", 1)).unwrap();
        let summary = hold_current(&h.state).await.unwrap();

        add_item(&h.state, add("tea", 1)).unwrap();
        let err = resume(&h.state, &summary.sale_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        // still parked
        assert_eq!(list_held(&h.state).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_hold_never_drops_lines_added_meanwhile() {
        let h = harness(FakeBackend::new().with_products(vec![rice(), tea()])).await;
        add_item(&h.state, add("rice", 1)).unwrap();

        let (held, added) = tokio::join!(hold_current(&h.state), async {
            tokio::task::yield_now().await;
            add_item(&h.state, add("tea", 1))
        });
        assert!(added.is_ok());

        let cart_ids: Vec<String> = get_cart(&h.state)
            .lines
            .into_iter()
            .map(|l| l.product_id)
            .collect();
        let parked = list_held(&h.state).await.unwrap();
        match held {
            Ok(summary) => {
                // tea landed after the reset
                assert_eq!(parked.len(), 1);
                assert_eq!(summary.line_count, 1);
                assert_eq!(cart_ids, vec!["tea".to_string()]);
            }
            Err(err) => {
                assert_eq!(err.code, ErrorCode::CartError);
                assert!(parked.is_empty());
                assert_eq!(cart_ids, vec!["rice".to_string(), "tea".to_string()]);
            }
        }
    }

    #[tokio::test]
    async fn test_discard_and_missing() {
        let h = harness(FakeBackend::new().with_products(vec![rice()])).await;
        add_item(&h.state, add("rice", 1)).unwrap();
        let summary = hold_current(&h.state).await.unwrap();

        discard(&h.state, &summary.sale_id).await.unwrap();
        assert!(list_held(&h.state).await.unwrap().is_empty());

        let err = discard(&h.state, &summary.sale_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = resume(&h.state, &summary.sale_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
