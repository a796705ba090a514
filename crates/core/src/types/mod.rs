//! Core types for Bloom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod contact;
pub mod email;
pub mod id;
pub mod price;

pub use catalog::{Item, Shop};
pub use contact::{ContactField, ContactForm, CustomerContact, FieldError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
