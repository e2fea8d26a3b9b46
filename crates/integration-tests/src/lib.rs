//! Integration tests for Attar.
//!
//! All tests run against [`MemoryStore`], the in-memory drop-in for the
//! hosted table store, with the same composite unique keys the hosted
//! schema declares. Fixtures below build rows the way the services do.
//!
//! # Test Categories
//!
//! - `cart_aggregate` - cart uniqueness, totals and counts
//! - `checkout_workflow` - order creation, snapshotting and compensation
//! - `wishlist_session` - wishlist membership and session scoping
//! - `admin_workflows` - reports, order status, catalog writes, polling

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use attar_core::{
    AdminNotification, Category, NotificationId, NotificationKind, Order, OrderId, OrderItem,
    OrderItemId, OrderStatus, PaymentMethod, Perfume, PerfumeId, StoreUser, UserId, UserRole,
    tables,
};
use attar_datastore::{MemoryStore, TableStore};
use attar_storefront::{CheckoutRequest, Identity};

/// A store with the composite unique keys the hosted schema declares.
#[must_use]
pub fn test_store() -> MemoryStore {
    MemoryStore::new()
        .with_unique(tables::CART_ITEMS, &["user_id", "perfume_id"])
        .with_unique(tables::WISHLIST_ITEMS, &["user_id", "perfume_id"])
}

/// A perfume row; `discount` in whole taka when present.
#[must_use]
pub fn perfume(name: &str, price: i64, discount: Option<i64>) -> Perfume {
    Perfume {
        id: PerfumeId::generate(),
        name: name.to_string(),
        brand: "Attar House".to_string(),
        description: String::new(),
        price: Decimal::new(price, 0),
        discount_price: discount.map(|d| Decimal::new(d, 0)),
        image_url: String::new(),
        category: Category::Unisex,
        stock: 10,
        featured: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Insert a perfume row and hand it back.
pub async fn seed_perfume(
    store: &MemoryStore,
    name: &str,
    price: i64,
    discount: Option<i64>,
) -> Perfume {
    let row = perfume(name, price, discount);
    let _: Vec<Perfume> = store
        .insert(tables::PERFUMES, &[row.clone()])
        .await
        .expect("seed perfume");
    row
}

/// A fresh customer identity.
#[must_use]
pub fn identity(name: &str) -> Identity {
    Identity {
        id: UserId::generate(),
        email: Some(format!("{name}@example.com")),
        name: Some(name.to_string()),
    }
}

/// Insert the user row backing an identity.
pub async fn seed_user(store: &MemoryStore, identity: &Identity) -> StoreUser {
    let user = StoreUser {
        id: identity.id,
        email: identity.email.clone(),
        phone: None,
        name: identity.name.clone(),
        address: None,
        role: UserRole::Customer,
        is_active: true,
        created_at: Utc::now(),
    };
    let _: Vec<StoreUser> = store
        .insert(tables::USERS, &[user.clone()])
        .await
        .expect("seed user");
    user
}

/// An order row created directly (bypassing checkout), for report tests.
#[must_use]
pub fn order(user_id: UserId, total: i64, status: OrderStatus, day: u32) -> Order {
    let at = Utc.with_ymd_and_hms(2026, 2, day, 10, 0, 0).single().expect("valid date");
    Order {
        id: OrderId::generate(),
        user_id,
        total_amount: Decimal::new(total, 0),
        payment_method: PaymentMethod::Cod,
        status,
        shipping_address: "12 Gulshan Avenue, Dhaka".to_string(),
        contact_name: "Test Customer".to_string(),
        contact_phone: "+8801700000001".to_string(),
        created_at: at,
        updated_at: at,
    }
}

/// An order item row created directly, for report tests.
#[must_use]
pub fn order_item(order_id: OrderId, perfume_id: PerfumeId, quantity: u32, price: i64) -> OrderItem {
    OrderItem {
        id: OrderItemId::generate(),
        order_id,
        perfume_id,
        quantity,
        price: Decimal::new(price, 0),
    }
}

/// A notification row.
#[must_use]
pub fn notification(title: &str, read: bool) -> AdminNotification {
    AdminNotification {
        id: NotificationId::generate(),
        title: title.to_string(),
        message: String::new(),
        kind: NotificationKind::Order,
        read,
        created_at: Utc::now(),
    }
}

/// A checkout request with the given total.
#[must_use]
pub fn checkout_request(total: i64) -> CheckoutRequest {
    CheckoutRequest {
        total_amount: Decimal::new(total, 0),
        payment_method: PaymentMethod::Bkash,
        shipping_address: "12 Gulshan Avenue, Dhaka".to_string(),
        contact_name: "Test Customer".to_string(),
        contact_phone: "+8801700000001".to_string(),
    }
}
