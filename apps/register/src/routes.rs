//! # Routes
//!
//! The HTTP surface the POS screen talks to. Handlers only unpack the
//! request and call into [`crate::commands`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /health                                  liveness                     │
//! │  /catalog/search, /catalog/reload         catalog                      │
//! │  /cart/...                                cart edits                   │
//! │  /customers                               customer lookup              │
//! │  /checkout/...                            bill session                 │
//! │  /held/...                                hold / resume                │
//! │                                                                         │
//! │  Errors: ApiError → (status, {"code", "message"})                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use tillpoint_core::{Customer, HeldSaleSummary, SessionView};

use crate::commands::cart::{
    self, AddItemRequest, AdjustmentsRequest, CartResponse, QuantityInput, SaleTypeRequest,
};
use crate::commands::catalog::{self, CatalogSummary, SearchRequest, SearchResponse};
use crate::commands::checkout::{
    self, CustomerRequest, PaymentRequest, SettleRequest, SettleResponse,
};
use crate::commands::customer::{self, CustomerQuery};
use crate::commands::held;
use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Builds the register router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Catalog
        .route("/catalog/search", get(search_catalog))
        .route("/catalog/reload", post(reload_catalog))
        // Cart
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/{index}", put(update_quantity))
        .route("/cart/items/{index}/removal", post(request_removal))
        .route("/cart/removal/confirm", post(confirm_removal))
        .route("/cart/removal/cancel", post(cancel_removal))
        .route("/cart/sale-type", put(set_sale_type))
        .route("/cart/adjustments", put(set_adjustments))
        .route("/cart/reset", post(reset_cart))
        // Customers
        .route("/customers", get(search_customers))
        // Checkout
        .route("/checkout", get(get_checkout).post(begin_checkout))
        .route("/checkout/customer", put(set_customer))
        .route("/checkout/payment", put(set_payment))
        .route("/checkout/save", post(save_bill))
        .route("/checkout/settle", post(settle_bill))
        .route("/checkout/cancel", post(cancel_bill))
        // Held sales
        .route("/held", get(list_held).post(hold_current))
        .route("/held/{id}/resume", post(resume_held))
        .route("/held/{id}", axum::routing::delete(discard_held))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

// =============================================================================
// Catalog
// =============================================================================

async fn search_catalog(
    State(state): State<AppState>,
    Query(request): Query<SearchRequest>,
) -> ApiResult<SearchResponse> {
    catalog::search(&state, request).await.map(Json)
}

async fn reload_catalog(State(state): State<AppState>) -> ApiResult<CatalogSummary> {
    catalog::load_catalog(&state).await.map(Json)
}

// =============================================================================
// Cart
// =============================================================================

async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    Json(cart::get_cart(&state))
}

async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<CartResponse> {
    cart::add_item(&state, request).map(Json)
}

async fn update_quantity(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(input): Json<QuantityInput>,
) -> ApiResult<CartResponse> {
    cart::update_quantity(&state, index, input).map(Json)
}

async fn request_removal(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<CartResponse> {
    cart::request_removal(&state, index).map(Json)
}

async fn confirm_removal(State(state): State<AppState>) -> ApiResult<CartResponse> {
    cart::confirm_removal(&state).map(Json)
}

async fn cancel_removal(State(state): State<AppState>) -> ApiResult<CartResponse> {
    cart::cancel_removal(&state).map(Json)
}

async fn set_sale_type(
    State(state): State<AppState>,
    Json(request): Json<SaleTypeRequest>,
) -> ApiResult<CartResponse> {
    cart::set_sale_type(&state, request).map(Json)
}

async fn set_adjustments(
    State(state): State<AppState>,
    Json(request): Json<AdjustmentsRequest>,
) -> ApiResult<CartResponse> {
    cart::set_adjustments(&state, request).map(Json)
}

async fn reset_cart(State(state): State<AppState>) -> ApiResult<CartResponse> {
    cart::reset_cart(&state).map(Json)
}

// =============================================================================
// Customers
// =============================================================================

async fn search_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> ApiResult<Vec<Customer>> {
    customer::search_customers(&state, query).await.map(Json)
}

// =============================================================================
// Checkout
// =============================================================================

async fn get_checkout(State(state): State<AppState>) -> Json<SessionView> {
    Json(checkout::get_checkout(&state))
}

async fn begin_checkout(State(state): State<AppState>) -> ApiResult<SessionView> {
    checkout::begin_checkout(&state).await.map(Json)
}

async fn set_customer(
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> ApiResult<SessionView> {
    checkout::set_customer(&state, request).map(Json)
}

async fn set_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<SessionView> {
    checkout::set_payment(&state, request).map(Json)
}

async fn save_bill(State(state): State<AppState>) -> ApiResult<SessionView> {
    checkout::save(&state).map(Json)
}

async fn settle_bill(
    State(state): State<AppState>,
    Json(request): Json<SettleRequest>,
) -> ApiResult<SettleResponse> {
    checkout::settle(&state, request).await.map(Json)
}

async fn cancel_bill(State(state): State<AppState>) -> ApiResult<SessionView> {
    checkout::cancel(&state).map(Json)
}

// =============================================================================
// Held Sales
// =============================================================================

async fn list_held(State(state): State<AppState>) -> ApiResult<Vec<HeldSaleSummary>> {
    held::list_held(&state).await.map(Json)
}

async fn hold_current(State(state): State<AppState>) -> ApiResult<HeldSaleSummary> {
    held::hold_current(&state).await.map(Json)
}

async fn resume_held(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CartResponse> {
    held::resume(&state, &id).await.map(Json)
}

async fn discard_held(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    held::discard(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
