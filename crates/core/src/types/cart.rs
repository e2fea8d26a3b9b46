//! Cart and wishlist row types.
//!
//! Both tables carry a composite unique key on `(user_id, perfume_id)`, so
//! the store holds at most one row per identity and perfume. The aggregate
//! in the storefront crate relies on the resulting conflict errors instead
//! of a racy lookup-then-insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CartItemId, PerfumeId, UserId, WishlistItemId};

/// A row of the `cart_items` table. `quantity` is always at least one; a
/// quantity change to zero deletes the row instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub perfume_id: PerfumeId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// A row of the `wishlist_items` table. No quantity; presence is the signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub perfume_id: PerfumeId,
    pub created_at: DateTime<Utc>,
}
