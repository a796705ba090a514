//! HTTP middleware for the storefront.
//!
//! # Middleware Stack (outermost first)
//!
//! 1. Sentry hub and transaction layers (added in `main`)
//! 2. `TraceLayer` (request span with method, URI, status, latency)
//! 3. Request ID (reuse or generate `x-request-id`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
