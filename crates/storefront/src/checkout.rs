//! The cart-to-order checkout workflow.
//!
//! Checkout snapshots the current cart into an immutable order + order-items
//! pair and then empties the cart. The generic table contract has no
//! transactions, so the workflow compensates instead: a failed item write
//! deletes the order row it just created, and a failed cart clear leaves
//! the placed order standing and reports it so the caller can retry just
//! the clear.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use attar_core::{Order, OrderId, OrderItem, OrderItemId, OrderStatus, PaymentMethod, tables};
use attar_datastore::{Filter, StoreError, TableStore};

use crate::session::ShopperSession;

/// What the buyer submits at checkout.
///
/// `total_amount` is taken as supplied and snapshotted onto the order - it
/// is not recomputed from the items.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
    pub contact_name: String,
    pub contact_phone: String,
}

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No signed-in identity.
    #[error("not signed in")]
    Unauthenticated,

    /// Nothing in the cart; no writes were performed.
    #[error("cart is empty")]
    EmptyCart,

    /// A store write failed and was fully compensated.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The order row exists but its items could not be written, and the
    /// compensating delete failed too. The named order needs manual
    /// cleanup.
    #[error("order {order_id} is missing its items and could not be removed")]
    PartialOrder { order_id: OrderId },

    /// The order was placed, but the cart rows could not be deleted. Retry
    /// the clear; the order itself is fine.
    #[error("order {order_id} was placed but the cart was not cleared")]
    CartNotCleared { order_id: OrderId },
}

#[derive(Serialize)]
struct CheckoutProfilePatch<'a> {
    address: &'a str,
    phone: &'a str,
}

impl<S: TableStore> ShopperSession<S> {
    /// Place an order from the current cart.
    ///
    /// Unit prices are snapshotted from the cart's joined perfumes at call
    /// time (the discount price when one is active), so the order is immune
    /// to later catalog changes. The identity's stored address and phone
    /// are updated as a side effect; that update failing does not block the
    /// order.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] before any write; otherwise the
    /// compensation semantics documented on [`CheckoutError`].
    #[instrument(skip(self, request), fields(user_id = %self.identity.id))]
    pub async fn place_order(
        &mut self,
        request: CheckoutRequest,
    ) -> Result<OrderId, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            user_id: self.identity.id,
            total_amount: request.total_amount,
            payment_method: request.payment_method,
            status: OrderStatus::Pending,
            shipping_address: request.shipping_address.clone(),
            contact_name: request.contact_name.clone(),
            contact_phone: request.contact_phone.clone(),
            created_at: now,
            updated_at: now,
        };

        let _: Vec<Order> = self
            .store
            .insert(tables::ORDERS, &std::slice::from_ref(&order))
            .await?;

        // Remember the shipping details on the profile for next time. Not
        // part of the order's fate.
        if let Err(e) = self
            .store
            .update::<_, serde_json::Value>(
                tables::USERS,
                &CheckoutProfilePatch {
                    address: &request.shipping_address,
                    phone: &request.contact_phone,
                },
                &[Filter::eq("id", self.identity.id)],
            )
            .await
        {
            warn!(error = %e, "checkout could not update the stored profile");
        }

        let items: Vec<OrderItem> = self
            .cart
            .iter()
            .map(|line| OrderItem {
                id: OrderItemId::generate(),
                order_id: order.id,
                perfume_id: line.item.perfume_id,
                quantity: line.item.quantity,
                price: line.unit_price(),
            })
            .collect();

        if let Err(e) = self
            .store
            .insert::<_, OrderItem>(tables::ORDER_ITEMS, &items)
            .await
        {
            // Compensate: take the order row back out so no itemless order
            // survives.
            return match self
                .store
                .delete(tables::ORDERS, &[Filter::eq("id", order.id)])
                .await
            {
                Ok(_) => Err(e.into()),
                Err(cleanup) => {
                    tracing::error!(
                        order_id = %order.id,
                        error = %cleanup,
                        "compensating order delete failed"
                    );
                    Err(CheckoutError::PartialOrder { order_id: order.id })
                }
            };
        }

        if let Err(e) = self
            .store
            .delete(
                tables::CART_ITEMS,
                &[Filter::eq("user_id", self.identity.id)],
            )
            .await
        {
            // The order stands; only the clear needs retrying. Keep the
            // in-memory view so the caller still sees what the store holds.
            warn!(order_id = %order.id, error = %e, "cart clear after checkout failed");
            return Err(CheckoutError::CartNotCleared { order_id: order.id });
        }
        self.cart.clear();

        info!(order_id = %order.id, total = %order.total_amount, "order placed");
        Ok(order.id)
    }
}
