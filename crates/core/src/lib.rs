//! Attar Core - Shared types library.
//!
//! This crate provides common types used across all Attar components:
//! - `storefront` - Customer-facing catalog, cart/wishlist and checkout services
//! - `admin` - Back-office views (dashboard, orders, products, banners, users)
//! - `cli` - Command-line tools for seeding and reporting
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no store
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money formatting, status enums, and the row
//!   types for every table in the remote store
//! - [`tables`] - Canonical table names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod tables;
pub mod types;

pub use types::*;
