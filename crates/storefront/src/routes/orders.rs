//! Checkout and order history route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bloom_core::{ContactForm, Order, OrderId};
use serde::Serialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Response to a successful checkout.
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
}

/// Submit the cart as an order.
///
/// Returns 201 with the new order ID, or 422 listing every invalid field and
/// whether the cart was empty.
// Contact details stay out of the span.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<OrderCreated>)> {
    let mut storefront = state.storefront().await;
    let order_id = storefront.submit_order(&form)?;
    add_breadcrumb("checkout", "Order submitted", &[("order_id", order_id.as_str())]);
    Ok((StatusCode::CREATED, Json(OrderCreated { order_id })))
}

/// Order history, newest first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let storefront = state.storefront().await;
    Ok(Json(storefront.orders()?))
}

/// One order by ID.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let storefront = state.storefront().await;
    Ok(Json(storefront.order_by_id(&id)?))
}
