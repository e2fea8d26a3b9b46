//! Error types for storefront session operations.

use thiserror::Error;

use attar_core::PerfumeId;
use attar_datastore::StoreError;

/// Errors from cart and wishlist operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation needs a signed-in identity and there is none.
    #[error("not signed in")]
    Unauthenticated,

    /// The referenced perfume does not exist in the catalog.
    #[error("perfume not found: {0}")]
    PerfumeNotFound(PerfumeId),

    /// The remote store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
