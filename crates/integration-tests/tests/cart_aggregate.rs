//! Cart aggregate invariants: one row per (identity, perfume), totals as
//! Σ effective price × quantity, counts as Σ quantities.

use chrono::Utc;
use rust_decimal::Decimal;

use attar_core::{CartItem, CartItemId, format_bdt, tables};
use attar_datastore::TableStore;
use attar_integration_tests::{identity, seed_perfume, test_store};
use attar_storefront::ShopperSession;

#[tokio::test]
async fn test_repeated_adds_accumulate_into_one_row() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 1000, None).await;

    let mut session = ShopperSession::open(store.clone(), identity("rahim"))
        .await
        .unwrap();

    session.add_to_cart(oud.id, 1).await.unwrap();
    session.add_to_cart(oud.id, 2).await.unwrap();
    session.add_to_cart(oud.id, 3).await.unwrap();

    // Never a duplicate row, quantity is the sum of adds
    assert_eq!(store.row_count(tables::CART_ITEMS), 1);
    assert_eq!(session.cart().len(), 1);
    assert_eq!(session.cart()[0].item.quantity, 6);
    assert_eq!(session.cart_item_count(), 6);
}

#[tokio::test]
async fn test_losing_the_insert_race_merges_quantities() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 1000, None).await;
    let shopper = identity("rahim");

    let mut session = ShopperSession::open(store.clone(), shopper.clone())
        .await
        .unwrap();

    // Another device inserts the row after this session loaded its view
    let remote = CartItem {
        id: CartItemId::generate(),
        user_id: shopper.id,
        perfume_id: oud.id,
        quantity: 2,
        created_at: Utc::now(),
    };
    let _: Vec<CartItem> = store.insert(tables::CART_ITEMS, &[remote]).await.unwrap();

    // This add conflicts on the unique key and folds into the survivor
    let line = session.add_to_cart(oud.id, 3).await.unwrap();
    assert_eq!(line.item.quantity, 5);
    assert_eq!(store.row_count(tables::CART_ITEMS), 1);
    assert_eq!(session.cart_item_count(), 5);
}

#[tokio::test]
async fn test_cart_total_over_mixed_discounts() {
    let store = test_store();
    let plain = seed_perfume(&store, "Citrus Sky", 1000, None).await;
    let discounted = seed_perfume(&store, "Jasmine Mist", 2000, Some(1500)).await;

    let mut session = ShopperSession::open(store.clone(), identity("farah"))
        .await
        .unwrap();

    // Empty cart sums to zero
    assert_eq!(session.cart_total(), Decimal::ZERO);
    assert_eq!(session.cart_item_count(), 0);

    session.add_to_cart(plain.id, 1).await.unwrap();
    session.add_to_cart(discounted.id, 2).await.unwrap();

    // 1000 + 1500 * 2, discount price wins where present
    assert_eq!(session.cart_total(), Decimal::new(4000, 0));
    assert_eq!(session.cart_item_count(), 3);
    assert_eq!(format_bdt(session.cart_total()), "৳4000");
}

#[tokio::test]
async fn test_count_sums_quantities_not_rows() {
    let store = test_store();
    let a = seed_perfume(&store, "Amber Dusk", 3200, None).await;
    let b = seed_perfume(&store, "Rose Dhaka", 1800, None).await;

    let mut session = ShopperSession::open(store.clone(), identity("nadia"))
        .await
        .unwrap();
    session.add_to_cart(a.id, 2).await.unwrap();
    session.add_to_cart(b.id, 3).await.unwrap();

    assert_eq!(session.cart().len(), 2);
    assert_eq!(session.cart_item_count(), 5);
}

#[tokio::test]
async fn test_quantity_zero_removes_the_row() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 1000, None).await;

    let mut session = ShopperSession::open(store.clone(), identity("rahim"))
        .await
        .unwrap();
    session.add_to_cart(oud.id, 2).await.unwrap();

    session.update_quantity(oud.id, 0).await.unwrap();
    assert!(session.cart().is_empty());
    assert_eq!(store.row_count(tables::CART_ITEMS), 0);
}

#[tokio::test]
async fn test_update_quantity_overwrites() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 1000, None).await;

    let mut session = ShopperSession::open(store.clone(), identity("rahim"))
        .await
        .unwrap();
    session.add_to_cart(oud.id, 2).await.unwrap();

    session.update_quantity(oud.id, 7).await.unwrap();
    assert_eq!(session.cart()[0].item.quantity, 7);

    session.reload_cart().await.unwrap();
    assert_eq!(session.cart()[0].item.quantity, 7);
}

#[tokio::test]
async fn test_clear_cart_deletes_only_this_identity() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 1000, None).await;

    let mut first = ShopperSession::open(store.clone(), identity("rahim"))
        .await
        .unwrap();
    let mut second = ShopperSession::open(store.clone(), identity("farah"))
        .await
        .unwrap();

    first.add_to_cart(oud.id, 1).await.unwrap();
    second.add_to_cart(oud.id, 4).await.unwrap();

    first.clear_cart().await.unwrap();
    assert!(first.cart().is_empty());
    assert_eq!(store.row_count(tables::CART_ITEMS), 1);

    second.reload_cart().await.unwrap();
    assert_eq!(second.cart_item_count(), 4);
}
