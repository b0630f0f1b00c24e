//! Order submission endpoint.

use axum::{Json, extract::State, http::StatusCode};
use dainam_core::{CartItem, ContactForm, OrderResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{CartStore, MemoryStorage};
use crate::checkout::{CheckoutError, submit_order};
use crate::state::AppState;

/// Body of `POST /api/orders`: the checkout form plus the browser's cart.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub contact: ContactForm,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// Place an order.
///
/// Invalid input is answered with 400 and a CMS rejection with 502; both
/// carry a message for the shopper.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> (StatusCode, Json<OrderResponse>) {
    let mut cart = CartStore::with_items(MemoryStorage::new(), request.items);

    match submit_order(&mut cart, &request.contact, state.wordpress()).await {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::created(order))),
        Err(e @ (CheckoutError::InvalidForm(_) | CheckoutError::EmptyCart)) => (
            StatusCode::BAD_REQUEST,
            Json(OrderResponse::rejected(e.to_string())),
        ),
        Err(CheckoutError::Rejected { message }) => (
            StatusCode::BAD_GATEWAY,
            Json(OrderResponse::rejected(message)),
        ),
    }
}
