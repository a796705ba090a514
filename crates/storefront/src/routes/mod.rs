//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Catalog
//! GET  /api/shops                       - Shop listing
//! GET  /api/items?shop=&sort=&order=    - Item listing (favorites first)
//!
//! # Cart
//! GET  /api/cart                        - Cart lines, total, item count
//! GET  /api/cart/count                  - Item count for the cart badge
//! POST /api/cart/add                    - Add an item
//! POST /api/cart/update                 - Set an item's quantity
//! POST /api/cart/remove                 - Remove an item
//! POST /api/cart/clear                  - Empty the cart
//!
//! # Favorites
//! GET  /api/favorites                   - Favorited item IDs
//! POST /api/favorites/{item_id}/toggle  - Flip an item's favorite flag
//!
//! # Orders
//! POST /api/orders                      - Checkout
//! GET  /api/orders                      - Order history
//! GET  /api/orders/{id}                 - Order detail
//! ```

pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::list))
        .route("/{item_id}/toggle", post(favorites::toggle))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::submit))
        .route("/{id}", get(orders::show))
}

/// Create all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shops", get(catalog::shops))
        .route("/items", get(catalog::items))
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
        .nest("/orders", order_routes())
}

/// Build the full application router with tracing and request IDs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
