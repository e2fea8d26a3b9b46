//! The identity-scoped cart/wishlist aggregate.
//!
//! A [`ShopperSession`] is constructed per signed-in identity and holds the
//! in-memory view of that identity's cart and wishlist, loaded wholesale
//! from the store and kept in step with every mutation. Dropping the
//! session discards the view; nothing is cached across sign-ins.
//!
//! The store enforces one cart row per (identity, perfume). The aggregate
//! checks its own view first, and when a concurrent add from another device
//! wins the insert race the resulting conflict is resolved by incrementing
//! the surviving row instead.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use attar_core::{
    CartItem, CartItemId, OrderId, Perfume, PerfumeId, WishlistItem, WishlistItemId, tables,
};
use attar_datastore::{Filter, Query, StoreError, TableStore};

use crate::checkout::{CheckoutError, CheckoutRequest};
use crate::error::SessionError;
use crate::identity::{Identity, IdentityEvent};

/// A cart row joined with its perfume.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItem,
    pub perfume: Perfume,
}

impl CartLine {
    /// The unit price a buyer pays for this line right now.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.perfume.effective_price()
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.item.quantity)
    }
}

/// A wishlist row joined with its perfume.
#[derive(Debug, Clone)]
pub struct WishlistLine {
    pub item: WishlistItem,
    pub perfume: Perfume,
}

#[derive(Serialize)]
struct QuantityPatch {
    quantity: u32,
}

/// Cart and wishlist state for one signed-in identity.
pub struct ShopperSession<S> {
    pub(crate) store: S,
    pub(crate) identity: Identity,
    pub(crate) cart: Vec<CartLine>,
    wishlist: Vec<WishlistLine>,
}

impl<S: TableStore> ShopperSession<S> {
    /// Open a session for `identity`, loading its cart and wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if either load fails; no session exists in that
    /// case.
    #[instrument(skip(store, identity), fields(user_id = %identity.id))]
    pub async fn open(store: S, identity: Identity) -> Result<Self, SessionError> {
        let mut session = Self {
            store,
            identity,
            cart: Vec::new(),
            wishlist: Vec::new(),
        };
        session.reload_cart().await?;
        session.reload_wishlist().await?;
        Ok(session)
    }

    /// The identity this session belongs to.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current cart lines.
    #[must_use]
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    /// Current wishlist lines.
    #[must_use]
    pub fn wishlist(&self) -> &[WishlistLine] {
        &self.wishlist
    }

    /// Replace the in-memory cart with the store's rows for this identity.
    ///
    /// Rows whose perfume has disappeared from the catalog are dropped from
    /// the view.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub async fn reload_cart(&mut self) -> Result<(), SessionError> {
        let items: Vec<CartItem> = self
            .store
            .select(
                tables::CART_ITEMS,
                Query::new().filter(Filter::eq("user_id", self.identity.id)),
            )
            .await?;

        let perfumes = self
            .perfumes_by_id(items.iter().map(|i| i.perfume_id))
            .await?;

        self.cart = items
            .into_iter()
            .filter_map(|item| {
                perfumes
                    .get(&item.perfume_id)
                    .cloned()
                    .map(|perfume| CartLine { item, perfume })
            })
            .collect();
        Ok(())
    }

    /// Replace the in-memory wishlist with the store's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub async fn reload_wishlist(&mut self) -> Result<(), SessionError> {
        let items: Vec<WishlistItem> = self
            .store
            .select(
                tables::WISHLIST_ITEMS,
                Query::new().filter(Filter::eq("user_id", self.identity.id)),
            )
            .await?;

        let perfumes = self
            .perfumes_by_id(items.iter().map(|i| i.perfume_id))
            .await?;

        self.wishlist = items
            .into_iter()
            .filter_map(|item| {
                perfumes
                    .get(&item.perfume_id)
                    .cloned()
                    .map(|perfume| WishlistLine { item, perfume })
            })
            .collect();
        Ok(())
    }

    /// Add `quantity` of a perfume to the cart.
    ///
    /// If the perfume is already in the cart its quantity is incremented;
    /// otherwise a new row is inserted. A storage conflict (a concurrent
    /// add for the same perfume won the race) is resolved by incrementing
    /// the surviving row.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PerfumeNotFound`] for an unknown perfume, or
    /// a store error.
    #[instrument(skip(self), fields(user_id = %self.identity.id, perfume_id = %perfume_id))]
    pub async fn add_to_cart(
        &mut self,
        perfume_id: PerfumeId,
        quantity: u32,
    ) -> Result<CartLine, SessionError> {
        let quantity = quantity.max(1);

        if let Some(line) = self
            .cart
            .iter()
            .find(|l| l.item.perfume_id == perfume_id)
            .cloned()
        {
            let merged = line.item.quantity + quantity;
            self.update_quantity(perfume_id, merged).await?;
            return self.line(perfume_id);
        }

        let perfume = self.fetch_perfume(perfume_id).await?;
        let item = CartItem {
            id: CartItemId::generate(),
            user_id: self.identity.id,
            perfume_id,
            quantity,
            created_at: Utc::now(),
        };

        match self
            .store
            .insert::<_, CartItem>(tables::CART_ITEMS, &[item.clone()])
            .await
        {
            Ok(rows) => {
                let stored = rows.into_iter().next().unwrap_or(item);
                self.cart.push(CartLine {
                    item: stored,
                    perfume,
                });
                self.line(perfume_id)
            }
            Err(StoreError::Conflict(_)) => {
                // Lost the insert race to another device; fold into the
                // surviving row.
                tracing::debug!("cart insert conflicted, merging quantities");
                let remote: Vec<CartItem> = self
                    .store
                    .select(
                        tables::CART_ITEMS,
                        Query::new()
                            .filter(Filter::eq("user_id", self.identity.id))
                            .filter(Filter::eq("perfume_id", perfume_id)),
                    )
                    .await?;
                let Some(existing) = remote.into_iter().next() else {
                    return Err(SessionError::PerfumeNotFound(perfume_id));
                };
                let merged = existing.quantity + quantity;
                self.cart.push(CartLine {
                    item: existing,
                    perfume,
                });
                self.update_quantity(perfume_id, merged).await?;
                self.line(perfume_id)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the stored quantity for a perfume. Zero removes the row,
    /// keeping the cart free of zero-quantity lines no matter the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    #[instrument(skip(self), fields(user_id = %self.identity.id, perfume_id = %perfume_id))]
    pub async fn update_quantity(
        &mut self,
        perfume_id: PerfumeId,
        quantity: u32,
    ) -> Result<(), SessionError> {
        if quantity == 0 {
            return self.remove_from_cart(perfume_id).await;
        }

        let _updated: Vec<CartItem> = self
            .store
            .update(
                tables::CART_ITEMS,
                &QuantityPatch { quantity },
                &[
                    Filter::eq("user_id", self.identity.id),
                    Filter::eq("perfume_id", perfume_id),
                ],
            )
            .await?;

        if let Some(line) = self
            .cart
            .iter_mut()
            .find(|l| l.item.perfume_id == perfume_id)
        {
            line.item.quantity = quantity;
        }
        Ok(())
    }

    /// Remove a perfume from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub async fn remove_from_cart(&mut self, perfume_id: PerfumeId) -> Result<(), SessionError> {
        self.store
            .delete(
                tables::CART_ITEMS,
                &[
                    Filter::eq("user_id", self.identity.id),
                    Filter::eq("perfume_id", perfume_id),
                ],
            )
            .await?;
        self.cart.retain(|l| l.item.perfume_id != perfume_id);
        Ok(())
    }

    /// Delete every cart row for this identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached; the in-memory view
    /// is left untouched in that case.
    pub async fn clear_cart(&mut self) -> Result<(), SessionError> {
        self.store
            .delete(
                tables::CART_ITEMS,
                &[Filter::eq("user_id", self.identity.id)],
            )
            .await?;
        self.cart.clear();
        Ok(())
    }

    /// Add a perfume to the wishlist. Adding one that is already there is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PerfumeNotFound`] for an unknown perfume, or
    /// a store error.
    #[instrument(skip(self), fields(user_id = %self.identity.id, perfume_id = %perfume_id))]
    pub async fn add_to_wishlist(&mut self, perfume_id: PerfumeId) -> Result<(), SessionError> {
        if self.is_in_wishlist(perfume_id) {
            return Ok(());
        }

        let perfume = self.fetch_perfume(perfume_id).await?;
        let item = WishlistItem {
            id: WishlistItemId::generate(),
            user_id: self.identity.id,
            perfume_id,
            created_at: Utc::now(),
        };

        match self
            .store
            .insert::<_, WishlistItem>(tables::WISHLIST_ITEMS, &[item.clone()])
            .await
        {
            Ok(rows) => {
                let stored = rows.into_iter().next().unwrap_or(item);
                self.wishlist.push(WishlistLine {
                    item: stored,
                    perfume,
                });
                Ok(())
            }
            // Another device added it first; converge on the stored row.
            Err(StoreError::Conflict(_)) => self.reload_wishlist().await,
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a perfume from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub async fn remove_from_wishlist(
        &mut self,
        perfume_id: PerfumeId,
    ) -> Result<(), SessionError> {
        self.store
            .delete(
                tables::WISHLIST_ITEMS,
                &[
                    Filter::eq("user_id", self.identity.id),
                    Filter::eq("perfume_id", perfume_id),
                ],
            )
            .await?;
        self.wishlist.retain(|l| l.item.perfume_id != perfume_id);
        Ok(())
    }

    /// Whether a perfume is on the wishlist. Pure membership test, no
    /// remote round-trip.
    #[must_use]
    pub fn is_in_wishlist(&self, perfume_id: PerfumeId) -> bool {
        self.wishlist
            .iter()
            .any(|l| l.item.perfume_id == perfume_id)
    }

    /// Cart total: Σ effective unit price × quantity.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.iter().map(CartLine::line_total).sum()
    }

    /// Total units in the cart (sum of quantities, not row count); drives
    /// the header badge.
    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.cart.iter().map(|l| l.item.quantity).sum()
    }

    fn line(&self, perfume_id: PerfumeId) -> Result<CartLine, SessionError> {
        self.cart
            .iter()
            .find(|l| l.item.perfume_id == perfume_id)
            .cloned()
            .ok_or(SessionError::PerfumeNotFound(perfume_id))
    }

    async fn fetch_perfume(&self, perfume_id: PerfumeId) -> Result<Perfume, SessionError> {
        let rows: Vec<Perfume> = self
            .store
            .select(
                tables::PERFUMES,
                Query::new().filter(Filter::eq("id", perfume_id)).limit(1),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or(SessionError::PerfumeNotFound(perfume_id))
    }

    async fn perfumes_by_id(
        &self,
        ids: impl Iterator<Item = PerfumeId>,
    ) -> Result<HashMap<PerfumeId, Perfume>, SessionError> {
        let ids: Vec<PerfumeId> = ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let perfumes: Vec<Perfume> = self
            .store
            .select(
                tables::PERFUMES,
                Query::new().filter(Filter::is_in("id", ids)),
            )
            .await?;
        Ok(perfumes.into_iter().map(|p| (p.id, p)).collect())
    }
}

/// Owns the current session and swaps it on identity changes.
///
/// Sign-out always discards the in-memory state, so nothing leaks into the
/// next signed-in identity.
pub struct SessionManager<S> {
    store: S,
    session: Option<ShopperSession<S>>,
}

impl<S: TableStore + Clone> SessionManager<S> {
    /// Create a manager with no signed-in identity.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            session: None,
        }
    }

    /// React to an identity change.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the new identity's state fails; the
    /// previous identity's state is already gone by then.
    #[instrument(skip(self, event))]
    pub async fn handle_event(&mut self, event: IdentityEvent) -> Result<(), SessionError> {
        // Drop the old view first, whatever happens next
        self.session = None;

        if let IdentityEvent::SignedIn(identity) = event {
            self.session = Some(ShopperSession::open(self.store.clone(), identity).await?);
        }
        Ok(())
    }

    /// The current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<&ShopperSession<S>> {
        self.session.as_ref()
    }

    /// Mutable access to the current session, if signed in.
    pub fn session_mut(&mut self) -> Option<&mut ShopperSession<S>> {
        self.session.as_mut()
    }

    /// Add to cart, failing when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unauthenticated`] without a session, or any
    /// session error.
    pub async fn add_to_cart(
        &mut self,
        perfume_id: PerfumeId,
        quantity: u32,
    ) -> Result<CartLine, SessionError> {
        let session = self
            .session
            .as_mut()
            .ok_or(SessionError::Unauthenticated)?;
        session.add_to_cart(perfume_id, quantity).await
    }

    /// Add to wishlist, failing when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unauthenticated`] without a session, or any
    /// session error.
    pub async fn add_to_wishlist(&mut self, perfume_id: PerfumeId) -> Result<(), SessionError> {
        let session = self
            .session
            .as_mut()
            .ok_or(SessionError::Unauthenticated)?;
        session.add_to_wishlist(perfume_id).await
    }

    /// Place an order from the current cart, failing when nobody is signed
    /// in.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Unauthenticated`] without a session, or any
    /// checkout error.
    pub async fn place_order(
        &mut self,
        request: CheckoutRequest,
    ) -> Result<OrderId, CheckoutError> {
        let session = self
            .session
            .as_mut()
            .ok_or(CheckoutError::Unauthenticated)?;
        session.place_order(request).await
    }
}
