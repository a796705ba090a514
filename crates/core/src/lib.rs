//! Bloom Core - Shared types and the cart aggregate.
//!
//! This crate provides the domain types used across all Bloom components:
//! - `storefront` - Persistence, checkout, and the JSON API
//! - `cli` - Command-line front end over a local data directory
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, catalog records, and contacts
//! - [`cart`] - The cart aggregate (quantity merging and derived totals)
//! - [`order`] - Immutable order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod order;
pub mod types;

pub use cart::{Cart, CartChange, CartError, CartLine};
pub use order::Order;
pub use types::*;
