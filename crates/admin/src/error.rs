//! Error type for admin operations.

use rust_decimal::Decimal;
use thiserror::Error;

use attar_datastore::StoreError;

/// Application-level error type for the admin services.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The remote store failed. Nothing is retried automatically; recovery
    /// is the operator's manual retry.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A discount price must be strictly below the list price.
    #[error("discount {discount} is not below price {price}")]
    InvalidDiscount { price: Decimal, discount: Decimal },
}
