//! Wishlist membership and session scoping on identity changes.

use chrono::Utc;

use attar_core::{WishlistItem, WishlistItemId, tables};
use attar_datastore::TableStore;
use attar_integration_tests::{identity, seed_perfume, test_store};
use attar_storefront::{IdentityEvent, SessionError, SessionManager, ShopperSession};

#[tokio::test]
async fn test_wishlist_round_trip() {
    let store = test_store();
    let rose = seed_perfume(&store, "Rose Dhaka", 1800, None).await;

    let mut session = ShopperSession::open(store.clone(), identity("nadia"))
        .await
        .unwrap();

    assert!(!session.is_in_wishlist(rose.id));

    session.add_to_wishlist(rose.id).await.unwrap();
    assert!(session.is_in_wishlist(rose.id));

    session.remove_from_wishlist(rose.id).await.unwrap();
    assert!(!session.is_in_wishlist(rose.id));
    assert_eq!(store.row_count(tables::WISHLIST_ITEMS), 0);
}

#[tokio::test]
async fn test_duplicate_add_is_idempotent() {
    let store = test_store();
    let rose = seed_perfume(&store, "Rose Dhaka", 1800, None).await;

    let mut session = ShopperSession::open(store.clone(), identity("nadia"))
        .await
        .unwrap();
    session.add_to_wishlist(rose.id).await.unwrap();
    session.add_to_wishlist(rose.id).await.unwrap();

    assert_eq!(store.row_count(tables::WISHLIST_ITEMS), 1);
    assert_eq!(session.wishlist().len(), 1);
}

#[tokio::test]
async fn test_conflicting_add_converges_on_the_stored_row() {
    let store = test_store();
    let rose = seed_perfume(&store, "Rose Dhaka", 1800, None).await;
    let shopper = identity("nadia");

    let mut session = ShopperSession::open(store.clone(), shopper.clone())
        .await
        .unwrap();

    // Another device added it after this session loaded its view
    let remote = WishlistItem {
        id: WishlistItemId::generate(),
        user_id: shopper.id,
        perfume_id: rose.id,
        created_at: Utc::now(),
    };
    let _: Vec<WishlistItem> = store
        .insert(tables::WISHLIST_ITEMS, &[remote])
        .await
        .unwrap();

    session.add_to_wishlist(rose.id).await.unwrap();
    assert!(session.is_in_wishlist(rose.id));
    assert_eq!(store.row_count(tables::WISHLIST_ITEMS), 1);
}

#[tokio::test]
async fn test_unknown_perfume_is_rejected() {
    let store = test_store();
    let mut session = ShopperSession::open(store.clone(), identity("nadia"))
        .await
        .unwrap();

    let missing = attar_core::PerfumeId::generate();
    let result = session.add_to_wishlist(missing).await;
    assert!(matches!(result, Err(SessionError::PerfumeNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_sign_out_clears_state_unconditionally() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 8000, None).await;
    let first = identity("rahim");

    let mut manager = SessionManager::new(store.clone());
    manager
        .handle_event(IdentityEvent::SignedIn(first.clone()))
        .await
        .unwrap();
    manager.add_to_cart(oud.id, 2).await.unwrap();
    manager.add_to_wishlist(oud.id).await.unwrap();

    manager.handle_event(IdentityEvent::SignedOut).await.unwrap();
    assert!(manager.session().is_none());

    // The next identity must not see the previous identity's state
    let second = identity("farah");
    manager
        .handle_event(IdentityEvent::SignedIn(second))
        .await
        .unwrap();
    let session = manager.session().unwrap();
    assert!(session.cart().is_empty());
    assert!(session.wishlist().is_empty());
    assert!(!session.is_in_wishlist(oud.id));

    // The first identity's rows are still in the store, just not visible
    assert_eq!(store.row_count(tables::CART_ITEMS), 1);
    assert_eq!(store.row_count(tables::WISHLIST_ITEMS), 1);
}

#[tokio::test]
async fn test_sign_in_reloads_from_the_store() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 8000, None).await;
    let shopper = identity("rahim");

    let mut manager = SessionManager::new(store.clone());
    manager
        .handle_event(IdentityEvent::SignedIn(shopper.clone()))
        .await
        .unwrap();
    manager.add_to_cart(oud.id, 3).await.unwrap();
    manager.handle_event(IdentityEvent::SignedOut).await.unwrap();

    manager
        .handle_event(IdentityEvent::SignedIn(shopper))
        .await
        .unwrap();
    let session = manager.session().unwrap();
    assert_eq!(session.cart_item_count(), 3);
}

#[tokio::test]
async fn test_signed_out_mutations_are_rejected() {
    let store = test_store();
    let oud = seed_perfume(&store, "Oud Royale", 8000, None).await;

    let mut manager = SessionManager::new(store.clone());
    let result = manager.add_to_cart(oud.id, 1).await;
    assert!(matches!(result, Err(SessionError::Unauthenticated)));

    let result = manager.add_to_wishlist(oud.id).await;
    assert!(matches!(result, Err(SessionError::Unauthenticated)));

    assert_eq!(store.row_count(tables::CART_ITEMS), 0);
    assert_eq!(store.row_count(tables::WISHLIST_ITEMS), 0);
}
