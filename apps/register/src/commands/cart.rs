//! # Cart Commands
//!
//! Scanning, quantity edits, the two-step remove and bill-level
//! adjustments. Every edit returns the whole cart so the screen can redraw
//! from one response.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tillpoint_core::{Cart, CartLine, CartTotals, CoreError, Money, SaleType};

use super::edit_cart;
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub sale_type: SaleType,
    pub tax_percent: Decimal,
    pub bill_discount: Money,
    pub shipping: Money,
    pub pending_removal: Option<usize>,
}

impl CartResponse {
    pub(crate) fn of(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
            sale_type: cart.sale_type(),
            tax_percent: cart.tax_rate().percentage(),
            bill_discount: cart.bill_discount(),
            shipping: cart.shipping(),
            pending_removal: cart.pending_removal(),
        }
    }
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
}

/// The raw text of the quantity field; blank or non-numeric means zero.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantityInput {
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleTypeRequest {
    pub sale_type: SaleType,
}

/// Bill-level terms in major units. Omitted fields are left alone.
///
/// Tax percent takes at most two decimal places; amounts round to the cent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentsRequest {
    pub tax_percent: Option<Decimal>,
    pub bill_discount: Option<Decimal>,
    pub shipping: Option<Decimal>,
}

// =============================================================================
// Commands
// =============================================================================

pub fn get_cart(state: &AppState) -> CartResponse {
    state.cart.with_cart(CartResponse::of)
}

/// Adds a catalog product, merging into its existing line.
pub fn add_item(state: &AppState, request: AddItemRequest) -> Result<CartResponse, ApiError> {
    let product = state
        .catalog
        .product(&request.product_id)
        .ok_or_else(|| ApiError::from(CoreError::ProductNotFound(request.product_id.clone())))?;

    let response = edit_cart(state, |cart| {
        let index = cart.add(&product, request.quantity)?;
        debug!(product_id = %product.id, index, quantity = %request.quantity, "Item added");
        Ok(CartResponse::of(cart))
    })?;
    Ok(response)
}

pub fn update_quantity(
    state: &AppState,
    index: usize,
    input: QuantityInput,
) -> Result<CartResponse, ApiError> {
    edit_cart(state, |cart| {
        cart.update_quantity_input(index, &input.quantity)?;
        debug!(index, input = %input.quantity, "Quantity updated");
        Ok(CartResponse::of(cart))
    })
}

/// First step of removing a line: the screen asks for confirmation.
pub fn request_removal(state: &AppState, index: usize) -> Result<CartResponse, ApiError> {
    edit_cart(state, |cart| {
        cart.request_removal(index)?;
        Ok(CartResponse::of(cart))
    })
}

pub fn confirm_removal(state: &AppState) -> Result<CartResponse, ApiError> {
    edit_cart(state, |cart| {
        let removed = cart.confirm_removal()?;
        debug!(product_id = %removed.product_id, "Line removed");
        Ok(CartResponse::of(cart))
    })
}

pub fn cancel_removal(state: &AppState) -> Result<CartResponse, ApiError> {
    edit_cart(state, |cart| {
        cart.cancel_removal();
        Ok(CartResponse::of(cart))
    })
}

/// Switching the tier reprices every line.
pub fn set_sale_type(state: &AppState, request: SaleTypeRequest) -> Result<CartResponse, ApiError> {
    edit_cart(state, |cart| {
        cart.set_sale_type(request.sale_type);
        debug!(sale_type = %request.sale_type, "Sale type changed");
        Ok(CartResponse::of(cart))
    })
}

pub fn set_adjustments(
    state: &AppState,
    request: AdjustmentsRequest,
) -> Result<CartResponse, ApiError> {
    edit_cart(state, |cart| {
        if let Some(pct) = request.tax_percent {
            cart.set_tax_percent(pct)?;
        }
        if let Some(amount) = request.bill_discount {
            cart.set_bill_discount(Money::from_decimal(amount))?;
        }
        if let Some(amount) = request.shipping {
            cart.set_shipping(Money::from_decimal(amount))?;
        }
        Ok(CartResponse::of(cart))
    })
}

pub fn reset_cart(state: &AppState) -> Result<CartResponse, ApiError> {
    let sale_type = state.config.default_sale_type();
    let response = edit_cart(state, |cart| {
        cart.reset(sale_type);
        Ok(CartResponse::of(cart))
    })?;
    info!("Cart reset");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{harness, rice, tea, FakeBackend};

    fn add(product_id: &str, quantity: i64) -> AddItemRequest {
        AddItemRequest {
            product_id: product_id.to_string(),
            quantity: Decimal::from(quantity),
        }
    }

    #[tokio::test]
    async fn test_add_merges_by_product() {
        let h = harness(FakeBackend::new().with_products(vec![rice(), tea()])).await;

        add_item(&h.state, add("rice", 1)).unwrap();
        add_item(&h.state, add("tea", 2)).unwrap();
        let cart = add_item(&h.state, add("rice", 2)).unwrap();

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].quantity, Decimal::from(3));
        // 3 × 90.00 + 2 × 5.00
        assert_eq!(cart.totals.grand_total, Money::from_cents(28000));
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let h = harness(FakeBackend::new()).await;
        let err = add_item(&h.state, add("ghost", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_beyond_stock() {
        let h = harness(FakeBackend::new().with_products(vec![tea()])).await;
        add_item(&h.state, add("tea", 3)).unwrap();

        let err = add_item(&h.state, add("tea", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(get_cart(&h.state).lines[0].quantity, Decimal::from(3));
    }

    #[tokio::test]
    async fn test_blank_quantity_becomes_zero() {
        let h = harness(FakeBackend::new().with_products(vec![rice()])).await;
        add_item(&h.state, add("rice", 2)).unwrap();

        let cart = update_quantity(
            &h.state,
            0,
            QuantityInput {
                quantity: "  ".to_string(),
            },
        )
        .unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, Decimal::ZERO);
        assert_eq!(cart.totals.grand_total, Money::zero());
    }

    #[tokio::test]
    async fn test_two_step_removal() {
        let h = harness(FakeBackend::new().with_products(vec![rice(), tea()])).await;
        add_item(&h.state, add("rice", 1)).unwrap();
        add_item(&h.state, add("tea", 1)).unwrap();

        let cart = request_removal(&h.state, 0).unwrap();
        assert_eq!(cart.pending_removal, Some(0));

        let cart = cancel_removal(&h.state).unwrap();
        assert_eq!(cart.pending_removal, None);
        assert_eq!(cart.lines.len(), 2);

        request_removal(&h.state, 0).unwrap();
        let cart = confirm_removal(&h.state).unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].product_id, "tea");

        let err = confirm_removal(&h.state).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_wholesale_reprices_lines() {
        let h = harness(FakeBackend::new().with_products(vec![rice()])).await;
        add_item(&h.state, add("rice", 2)).unwrap();

        let cart = set_sale_type(
            &h.state,
            SaleTypeRequest {
                sale_type: SaleType::Wholesale,
            },
        )
        .unwrap();
        assert_eq!(cart.lines[0].unit_price, Money::from_cents(8500));
        assert_eq!(cart.totals.grand_total, Money::from_cents(17000));
    }

    #[tokio::test]
    async fn test_adjustments_flow_into_totals() {
        let h = harness(FakeBackend::new().with_products(vec![rice()])).await;
        add_item(&h.state, add("rice", 1)).unwrap();

        let cart = set_adjustments(
            &h.state,
            AdjustmentsRequest {
                tax_percent: Some(Decimal::from(10)),
                bill_discount: Some(Decimal::from(5)),
                shipping: None,
            },
        )
        .unwrap();
        assert_eq!(cart.tax_percent, Decimal::from(10));
        assert_eq!(cart.bill_discount, Money::from_cents(500));
        assert_eq!(cart.shipping, Money::zero());
    }

    #[tokio::test]
    async fn test_adjustments_reject_precise_tax_and_huge_amounts() {
        let h = harness(FakeBackend::new().with_products(vec![rice()])).await;
        add_item(&h.state, add("rice", 1)).unwrap();

        let err = set_adjustments(
            &h.state,
            AdjustmentsRequest {
                tax_percent: Some(Decimal::new(8255, 3)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = set_adjustments(
            &h.state,
            AdjustmentsRequest {
                bill_discount: Some(Decimal::from(10i64.pow(17))),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let cart = get_cart(&h.state);
        assert_eq!(cart.tax_percent, Decimal::ZERO);
        assert_eq!(cart.bill_discount, Money::zero());
        assert_eq!(cart.totals.grand_total, Money::from_cents(9000));
    }

    #[tokio::test]
    async fn test_cart_locked_while_bill_open() {
        let h = harness(
            FakeBackend::new()
                .with_products(vec![rice(), tea()])
                .with_next_number("7"),
        )
        .await;
        add_item(&h.state, add("rice", 1)).unwrap();
        crate::commands::checkout::begin_checkout(&h.state).await.unwrap();

        let err = add_item(&h.state, add("tea", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionError);
        let err = reset_cart(&h.state).unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionError);
        assert_eq!(get_cart(&h.state).lines.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_returns_to_default_sale_type() {
        let h = harness(FakeBackend::new().with_products(vec![rice()])).await;
        add_item(&h.state, add("rice", 1)).unwrap();
        set_sale_type(
            &h.state,
            SaleTypeRequest {
                sale_type: SaleType::Wholesale,
            },
        )
        .unwrap();

        let cart = reset_cart(&h.state).unwrap();
        assert!(cart.lines.is_empty());
        assert_eq!(cart.sale_type, SaleType::Retail);
    }
}
