//! Attar Admin - back-office services.
//!
//! Everything the admin panel needs, with no rendering concerns:
//!
//! - [`reports`] - dashboard stats, top products, recent orders
//! - [`orders`] - order listing, detail and status management
//! - [`products`] - catalog writes (with the discount invariant)
//! - [`banners`] - banner management
//! - [`users`] - user listing, activation and derived stats
//! - [`notifications`] - notification feed and the 30-second badge poller
//! - [`settings`] - store-wide string settings
//!
//! Aggregations reduce fetched rows client-side; the generic table contract
//! has no sum/group-by. Ordering and limiting are pushed to the store where
//! the contract allows it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod banners;
pub mod error;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod reports;
pub mod settings;
pub mod users;

pub use error::AdminError;
