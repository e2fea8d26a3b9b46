//! Order management.
//!
//! Status writes are free-form within the closed [`OrderStatus`]
//! vocabulary - the panel may move an order to any status, and `cancelled`
//! is reachable from every non-terminal state. No transition graph is
//! enforced.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use attar_core::{Order, OrderId, OrderItem, OrderStatus, tables};
use attar_datastore::{Filter, Query, TableStore};

use crate::error::AdminError;

/// An order with its line items.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Serialize)]
struct StatusPatch {
    status: OrderStatus,
    updated_at: DateTime<Utc>,
}

/// All orders newest-first, optionally restricted to one status.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn list<S: TableStore>(
    store: &S,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, AdminError> {
    let mut query = Query::new().order_desc("created_at");
    if let Some(status) = status {
        query = query.filter(Filter::eq("status", status));
    }
    let orders: Vec<Order> = store.select(tables::ORDERS, query).await?;
    Ok(orders)
}

/// One order joined with its items.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown order, or a store
/// error.
pub async fn get_detail<S: TableStore>(
    store: &S,
    id: OrderId,
) -> Result<OrderDetail, AdminError> {
    let orders: Vec<Order> = store
        .select(
            tables::ORDERS,
            Query::new().filter(Filter::eq("id", id)).limit(1),
        )
        .await?;
    let order = orders
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("order {id}")))?;

    let items: Vec<OrderItem> = store
        .select(
            tables::ORDER_ITEMS,
            Query::new().filter(Filter::eq("order_id", id)),
        )
        .await?;

    Ok(OrderDetail { order, items })
}

/// Set an order's status, bumping `updated_at`.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown order, or a store
/// error.
#[instrument(skip(store), fields(order_id = %id))]
pub async fn set_status<S: TableStore>(
    store: &S,
    id: OrderId,
    status: OrderStatus,
) -> Result<Order, AdminError> {
    let updated: Vec<Order> = store
        .update(
            tables::ORDERS,
            &StatusPatch {
                status,
                updated_at: Utc::now(),
            },
            &[Filter::eq("id", id)],
        )
        .await?;

    let order = updated
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("order {id}")))?;

    info!(status = %status, "order status updated");
    Ok(order)
}
