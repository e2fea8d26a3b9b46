//! Print the dashboard summary.

use tracing::info;

use attar_admin::reports;
use attar_core::format_bdt;
use attar_datastore::{RestStore, StoreConfig};

/// Run the stats command.
///
/// # Errors
///
/// Returns an error if configuration is missing or a report query fails.
pub async fn run(top: usize) -> Result<(), Box<dyn std::error::Error>> {
    let store = RestStore::new(&StoreConfig::from_env()?);

    let stats = reports::dashboard_stats(&store).await;
    info!(
        orders = stats.order_count,
        revenue = %format_bdt(stats.total_revenue),
        customers = stats.customer_count,
        products = stats.product_count,
        "dashboard"
    );

    for (rank, product) in reports::top_products(&store, top).await?.iter().enumerate() {
        info!(
            rank = rank + 1,
            name = %product.name,
            brand = %product.brand,
            units = product.units_sold,
            revenue = %format_bdt(product.revenue),
            "best seller"
        );
    }

    for order in reports::recent_orders(&store, 5).await? {
        info!(
            order_id = %order.id,
            status = %order.status,
            total = %format_bdt(order.total_amount),
            "recent order"
        );
    }

    Ok(())
}
