//! Bloom storefront library.
//!
//! Cart and order lifecycle for a small flower-shop storefront: a catalog,
//! a persistent cart, favorites, and an append-only order log, driven through
//! [`services::Storefront`] and exposed over HTTP by [`routes`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
