//! Names of the tables in the remote store.
//!
//! Kept in one place so the storefront and admin crates cannot drift on
//! spelling.

pub const PERFUMES: &str = "perfumes";
pub const USERS: &str = "users";
pub const CART_ITEMS: &str = "cart_items";
pub const WISHLIST_ITEMS: &str = "wishlist_items";
pub const ORDERS: &str = "orders";
pub const ORDER_ITEMS: &str = "order_items";
pub const BANNERS: &str = "banners";
pub const SETTINGS: &str = "settings";
pub const ADMIN_NOTIFICATIONS: &str = "admin_notifications";
