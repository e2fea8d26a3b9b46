//! Promotional banners shown on the storefront.

use attar_core::{Banner, tables};
use attar_datastore::{Filter, Query, StoreError, TableStore};

/// Active banners in display order.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn active_banners<S: TableStore>(store: &S) -> Result<Vec<Banner>, StoreError> {
    store
        .select(
            tables::BANNERS,
            Query::new()
                .filter(Filter::eq("active", true))
                .order_asc("position"),
        )
        .await
}
