//! Cart route handlers.
//!
//! Mutations answer with the change that was applied plus the cart's new
//! item count and total, so clients can refresh a cart badge without a
//! second request.

use axum::{Json, extract::State};
use bloom_core::{CartChange, CartError, CartLine, ItemId, Price};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::{CartEvent, Storefront};
use crate::state::AppState;
use crate::storage::FileStore;

/// One cart line as shown to clients.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub item_id: ItemId,
    pub name: String,
    pub image: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item.id.clone(),
            name: line.item.name.clone(),
            image: line.item.image.clone(),
            unit_price: line.item.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Cart contents with derived totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: Price,
    pub item_count: u64,
}

impl CartView {
    fn of(storefront: &Storefront<FileStore>) -> Self {
        Self {
            lines: storefront.cart().lines().iter().map(CartLineView::from).collect(),
            total: storefront.total(),
            item_count: storefront.item_count(),
        }
    }
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub item_count: u64,
}

/// Add to cart request body.
///
/// `quantity` is signed so that zero and negative values reach the
/// structured `InvalidQuantity` error instead of a JSON parse failure.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub item_id: ItemId,
    pub quantity: Option<i64>,
}

/// Update quantity request body. Zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub item_id: ItemId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub item_id: ItemId,
}

fn event(storefront: &Storefront<FileStore>, change: CartChange) -> Json<CartEvent> {
    Json(CartEvent {
        change,
        item_count: storefront.item_count(),
        total: storefront.total(),
    })
}

/// Show the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let storefront = state.storefront().await;
    Json(CartView::of(&storefront))
}

/// Cart item count.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    let storefront = state.storefront().await;
    Json(CartCount {
        item_count: storefront.item_count(),
    })
}

/// Add an item. Quantity defaults to 1.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartEvent>> {
    let requested = request.quantity.unwrap_or(1);
    let quantity = match u32::try_from(requested) {
        Ok(quantity) => quantity,
        Err(_) if requested <= 0 => return Err(CartError::InvalidQuantity(requested).into()),
        Err(_) => {
            return Err(AppError::BadRequest(format!(
                "quantity must be at most {}, got {requested}",
                u32::MAX
            )));
        }
    };

    let mut storefront = state.storefront().await;
    let change = storefront.add_to_cart(&request.item_id, quantity)?;
    Ok(event(&storefront, change))
}

/// Set an item's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartEvent>> {
    let mut storefront = state.storefront().await;
    let change = storefront.update_quantity(&request.item_id, request.quantity)?;
    Ok(event(&storefront, change))
}

/// Remove an item's line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartEvent>> {
    let mut storefront = state.storefront().await;
    let change = storefront.remove_from_cart(&request.item_id)?;
    Ok(event(&storefront, change))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartEvent>> {
    let mut storefront = state.storefront().await;
    let change = storefront.clear_cart()?;
    Ok(event(&storefront, change))
}
