//! User management and derived per-user stats.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use attar_core::{Order, StoreUser, UserId, tables};
use attar_datastore::{Filter, Query, TableStore};

use crate::error::AdminError;

/// Derived order stats for one user. Computed from their orders on demand,
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total_orders: u64,
    pub total_spent: Decimal,
}

#[derive(Serialize)]
struct ActivePatch {
    is_active: bool,
}

/// All users, newest first.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn list_users<S: TableStore>(store: &S) -> Result<Vec<StoreUser>, AdminError> {
    let users: Vec<StoreUser> = store
        .select(tables::USERS, Query::new().order_desc("created_at"))
        .await?;
    Ok(users)
}

/// Activate or deactivate a user.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown user, or a store error.
#[instrument(skip(store), fields(user_id = %id))]
pub async fn set_active<S: TableStore>(
    store: &S,
    id: UserId,
    is_active: bool,
) -> Result<StoreUser, AdminError> {
    let updated: Vec<StoreUser> = store
        .update(
            tables::USERS,
            &ActivePatch { is_active },
            &[Filter::eq("id", id)],
        )
        .await?;

    let user = updated
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("user {id}")))?;

    info!(is_active, "user activity flag updated");
    Ok(user)
}

/// Order count and lifetime spend for one user.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn user_stats<S: TableStore>(store: &S, id: UserId) -> Result<UserStats, AdminError> {
    let orders: Vec<Order> = store
        .select(
            tables::ORDERS,
            Query::new().filter(Filter::eq("user_id", id)),
        )
        .await?;

    Ok(UserStats {
        total_orders: orders.len() as u64,
        total_spent: orders.iter().map(|o| o.total_amount).sum(),
    })
}
