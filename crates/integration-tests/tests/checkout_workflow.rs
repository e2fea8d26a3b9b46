//! Checkout workflow: snapshotting, preconditions and compensation.

use rust_decimal::Decimal;

use attar_core::{Order, OrderItem, StoreUser, tables};
use attar_datastore::{FailOp, Query, TableStore};
use attar_integration_tests::{checkout_request, identity, seed_perfume, seed_user, test_store};
use attar_storefront::{CheckoutError, SessionManager, ShopperSession};

#[tokio::test]
async fn test_successful_checkout_snapshots_and_clears() {
    let store = test_store();
    let shopper = identity("rahim");
    seed_user(&store, &shopper).await;

    let plain = seed_perfume(&store, "Citrus Sky", 1000, None).await;
    let discounted = seed_perfume(&store, "Jasmine Mist", 2000, Some(1500)).await;

    let mut session = ShopperSession::open(store.clone(), shopper.clone())
        .await
        .unwrap();
    session.add_to_cart(plain.id, 1).await.unwrap();
    session.add_to_cart(discounted.id, 2).await.unwrap();

    let order_id = session.place_order(checkout_request(4000)).await.unwrap();

    // Cart is gone, one order and one item per pre-checkout line exist
    assert!(session.cart().is_empty());
    assert_eq!(store.row_count(tables::CART_ITEMS), 0);
    assert_eq!(store.row_count(tables::ORDERS), 1);
    assert_eq!(store.row_count(tables::ORDER_ITEMS), 2);

    let orders: Vec<Order> = store.select(tables::ORDERS, Query::new()).await.unwrap();
    // Total is taken as supplied, not recomputed
    assert_eq!(orders[0].id, order_id);
    assert_eq!(orders[0].total_amount, Decimal::new(4000, 0));

    let items: Vec<OrderItem> = store
        .select(tables::ORDER_ITEMS, Query::new())
        .await
        .unwrap();
    let mut prices: Vec<Decimal> = items.iter().map(|i| i.price).collect();
    prices.sort();
    assert_eq!(prices, vec![Decimal::new(1000, 0), Decimal::new(1500, 0)]);
}

#[tokio::test]
async fn test_checkout_updates_the_stored_profile() {
    let store = test_store();
    let shopper = identity("farah");
    seed_user(&store, &shopper).await;

    let oud = seed_perfume(&store, "Oud Royale", 8000, None).await;
    let mut session = ShopperSession::open(store.clone(), shopper.clone())
        .await
        .unwrap();
    session.add_to_cart(oud.id, 1).await.unwrap();
    session.place_order(checkout_request(8000)).await.unwrap();

    let users: Vec<StoreUser> = store.select(tables::USERS, Query::new()).await.unwrap();
    assert_eq!(
        users[0].address.as_deref(),
        Some("12 Gulshan Avenue, Dhaka")
    );
    assert_eq!(users[0].phone.as_deref(), Some("+8801700000001"));
}

#[tokio::test]
async fn test_snapshotted_prices_survive_catalog_changes() {
    let store = test_store();
    let shopper = identity("rahim");
    seed_user(&store, &shopper).await;

    let discounted = seed_perfume(&store, "Jasmine Mist", 2000, Some(1500)).await;
    let mut session = ShopperSession::open(store.clone(), shopper.clone())
        .await
        .unwrap();
    session.add_to_cart(discounted.id, 1).await.unwrap();
    session.place_order(checkout_request(1500)).await.unwrap();

    // The catalog price doubles afterwards
    let _: Vec<serde_json::Value> = store
        .update(
            tables::PERFUMES,
            &serde_json::json!({"price": "4000", "discount_price": null}),
            &[attar_datastore::Filter::eq("id", discounted.id)],
        )
        .await
        .unwrap();

    let items: Vec<OrderItem> = store
        .select(tables::ORDER_ITEMS, Query::new())
        .await
        .unwrap();
    assert_eq!(items[0].price, Decimal::new(1500, 0));
}

#[tokio::test]
async fn test_empty_cart_checkout_writes_nothing() {
    let store = test_store();
    let shopper = identity("rahim");
    seed_user(&store, &shopper).await;

    let mut session = ShopperSession::open(store.clone(), shopper).await.unwrap();
    let result = session.place_order(checkout_request(0)).await;

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    assert_eq!(store.row_count(tables::ORDERS), 0);
    assert_eq!(store.row_count(tables::ORDER_ITEMS), 0);
}

#[tokio::test]
async fn test_signed_out_checkout_writes_nothing() {
    let store = test_store();
    let mut manager = SessionManager::new(store.clone());

    let result = manager.place_order(checkout_request(1000)).await;
    assert!(matches!(result, Err(CheckoutError::Unauthenticated)));
    assert_eq!(store.row_count(tables::ORDERS), 0);
}

#[tokio::test]
async fn test_failed_items_write_compensates_the_order() {
    let store = test_store();
    let shopper = identity("rahim");
    seed_user(&store, &shopper).await;

    let oud = seed_perfume(&store, "Oud Royale", 8000, None).await;
    let mut session = ShopperSession::open(store.clone(), shopper).await.unwrap();
    session.add_to_cart(oud.id, 1).await.unwrap();

    store.fail_next(FailOp::Insert, tables::ORDER_ITEMS);
    let result = session.place_order(checkout_request(8000)).await;

    // The order row was taken back out; the cart is untouched
    assert!(matches!(result, Err(CheckoutError::Store(_))));
    assert_eq!(store.row_count(tables::ORDERS), 0);
    assert_eq!(store.row_count(tables::ORDER_ITEMS), 0);
    assert_eq!(store.row_count(tables::CART_ITEMS), 1);
    assert_eq!(session.cart_item_count(), 1);
}

#[tokio::test]
async fn test_failed_compensation_names_the_stranded_order() {
    let store = test_store();
    let shopper = identity("rahim");
    seed_user(&store, &shopper).await;

    let oud = seed_perfume(&store, "Oud Royale", 8000, None).await;
    let mut session = ShopperSession::open(store.clone(), shopper).await.unwrap();
    session.add_to_cart(oud.id, 1).await.unwrap();

    store.fail_next(FailOp::Insert, tables::ORDER_ITEMS);
    store.fail_next(FailOp::Delete, tables::ORDERS);
    let result = session.place_order(checkout_request(8000)).await;

    let Err(CheckoutError::PartialOrder { order_id }) = result else {
        panic!("expected PartialOrder, got {result:?}");
    };

    // The itemless order is still there, named for manual cleanup
    let orders: Vec<Order> = store.select(tables::ORDERS, Query::new()).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order_id);
    assert_eq!(store.row_count(tables::ORDER_ITEMS), 0);
}

#[tokio::test]
async fn test_failed_cart_clear_leaves_the_order_standing() {
    let store = test_store();
    let shopper = identity("rahim");
    seed_user(&store, &shopper).await;

    let oud = seed_perfume(&store, "Oud Royale", 8000, None).await;
    let mut session = ShopperSession::open(store.clone(), shopper).await.unwrap();
    session.add_to_cart(oud.id, 1).await.unwrap();

    store.fail_next(FailOp::Delete, tables::CART_ITEMS);
    let result = session.place_order(checkout_request(8000)).await;

    let Err(CheckoutError::CartNotCleared { order_id: _ }) = result else {
        panic!("expected CartNotCleared, got {result:?}");
    };

    // Order and items are fine; only the clear needs retrying
    assert_eq!(store.row_count(tables::ORDERS), 1);
    assert_eq!(store.row_count(tables::ORDER_ITEMS), 1);
    assert_eq!(store.row_count(tables::CART_ITEMS), 1);

    session.clear_cart().await.unwrap();
    assert_eq!(store.row_count(tables::CART_ITEMS), 0);
}
