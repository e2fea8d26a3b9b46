//! Order row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, OrderItemId, OrderStatus, PaymentMethod, PerfumeId, UserId};

/// A row of the `orders` table.
///
/// `total_amount` is snapshotted at checkout and never recomputed from the
/// items afterwards, so an order's total is stable even if its line items or
/// the catalog change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of the `order_items` table.
///
/// `price` is the unit price captured at order time (the discount price when
/// one was active), decoupled from the live catalog so historical orders
/// stay stable under later price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub perfume_id: PerfumeId,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    /// Line total for this item.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: OrderItemId::generate(),
            order_id: OrderId::generate(),
            perfume_id: PerfumeId::generate(),
            quantity: 3,
            price: Decimal::new(1500, 0),
        };
        assert_eq!(item.line_total(), Decimal::new(4500, 0));
    }
}
