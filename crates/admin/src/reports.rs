//! Dashboard and report aggregations.
//!
//! The store's query contract has no sum/group-by, so revenue and
//! best-seller numbers are reduced client-side over fetched rows, the way
//! the admin panel has always computed them. Ordering and limiting are
//! pushed down where the contract allows (recent orders).

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::instrument;

use attar_core::{Order, OrderItem, Perfume, PerfumeId, StoreUser, UserRole, tables};
use attar_datastore::{Filter, Query, TableStore};

use crate::error::AdminError;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub order_count: u64,
    pub total_revenue: Decimal,
    pub customer_count: u64,
    pub product_count: u64,
}

/// One row of the best-seller table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    pub perfume_id: PerfumeId,
    pub name: String,
    pub brand: String,
    pub units_sold: u32,
    pub revenue: Decimal,
}

/// Compute the dashboard stats.
///
/// The three table fetches run concurrently and are joined before
/// reducing. A failed fetch degrades its metrics to zero (logged) instead
/// of blanking the whole dashboard; callers that need hard failures use
/// the individual queries.
#[instrument(skip(store))]
pub async fn dashboard_stats<S: TableStore>(store: &S) -> DashboardStats {
    let orders_future = store.select::<Order>(tables::ORDERS, Query::new());
    let customers_future = store.select::<StoreUser>(
        tables::USERS,
        Query::new().filter(Filter::eq("role", UserRole::Customer)),
    );
    let products_future = store.select::<Perfume>(tables::PERFUMES, Query::new());

    let (orders_result, customers_result, products_result) =
        tokio::join!(orders_future, customers_future, products_future);

    let (order_count, total_revenue) = match orders_result {
        Ok(orders) => {
            let revenue = orders.iter().map(|o| o.total_amount).sum();
            (orders.len() as u64, revenue)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch orders for dashboard");
            (0, Decimal::ZERO)
        }
    };

    let customer_count = match customers_result {
        Ok(customers) => customers.len() as u64,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch customers for dashboard");
            0
        }
    };

    let product_count = match products_result {
        Ok(products) => products.len() as u64,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch products for dashboard");
            0
        }
    };

    DashboardStats {
        order_count,
        total_revenue,
        customer_count,
        product_count,
    }
}

/// Best-selling perfumes by revenue, descending.
///
/// Groups all order items by perfume and sums revenue client-side. Ties
/// are broken by name so the result is stable. Perfumes since removed from
/// the catalog keep their sales under a placeholder name.
///
/// # Errors
///
/// Returns an error if a store request fails.
#[instrument(skip(store))]
pub async fn top_products<S: TableStore>(
    store: &S,
    limit: usize,
) -> Result<Vec<TopProduct>, AdminError> {
    let items: Vec<OrderItem> = store.select(tables::ORDER_ITEMS, Query::new()).await?;

    let mut grouped: HashMap<PerfumeId, (u32, Decimal)> = HashMap::new();
    for item in &items {
        let entry = grouped.entry(item.perfume_id).or_insert((0, Decimal::ZERO));
        entry.0 += item.quantity;
        entry.1 += item.line_total();
    }

    let perfumes: HashMap<PerfumeId, Perfume> = if grouped.is_empty() {
        HashMap::new()
    } else {
        let rows: Vec<Perfume> = store
            .select(
                tables::PERFUMES,
                Query::new().filter(Filter::is_in("id", grouped.keys().copied())),
            )
            .await?;
        rows.into_iter().map(|p| (p.id, p)).collect()
    };

    let mut top: Vec<TopProduct> = grouped
        .into_iter()
        .map(|(perfume_id, (units_sold, revenue))| {
            let (name, brand) = perfumes.get(&perfume_id).map_or_else(
                || ("(removed)".to_string(), String::new()),
                |p| (p.name.clone(), p.brand.clone()),
            );
            TopProduct {
                perfume_id,
                name,
                brand,
                units_sold,
                revenue,
            }
        })
        .collect();

    top.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    top.truncate(limit);
    Ok(top)
}

/// The most recent orders, newest first. Ordering and limiting happen in
/// the store, not here.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn recent_orders<S: TableStore>(
    store: &S,
    limit: u32,
) -> Result<Vec<Order>, AdminError> {
    let orders: Vec<Order> = store
        .select(
            tables::ORDERS,
            Query::new().order_desc("created_at").limit(limit),
        )
        .await?;
    Ok(orders)
}
