//! Catalog row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PerfumeId;

/// Catalog category for a perfume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Men,
    Women,
    Unisex,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Men => write!(f, "men"),
            Self::Women => write!(f, "women"),
            Self::Unisex => write!(f, "unisex"),
        }
    }
}

/// A row of the `perfumes` table.
///
/// `discount_price`, when present, is the price actually charged; it must be
/// strictly below `price` (validated at the admin write path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perfume {
    pub id: PerfumeId,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub image_url: String,
    pub category: Category,
    /// Units on hand; never negative.
    pub stock: u32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Perfume {
    /// The price a buyer pays right now: the discount price when one is set,
    /// the list price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether a discount is currently applied.
    #[must_use]
    pub const fn is_discounted(&self) -> bool {
        self.discount_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perfume(price: i64, discount: Option<i64>) -> Perfume {
        Perfume {
            id: PerfumeId::generate(),
            name: "Oud Royale".to_string(),
            brand: "Attar".to_string(),
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

    #[test]
    fn test_effective_price_prefers_discount() {
        assert_eq!(
            perfume(2000, Some(1500)).effective_price(),
            Decimal::new(1500, 0)
        );
        assert_eq!(perfume(1000, None).effective_price(), Decimal::new(1000, 0));
    }

    #[test]
    fn test_category_wire_format() {
        assert_eq!(serde_json::to_string(&Category::Men).unwrap(), "\"men\"");
        let parsed: Category = serde_json::from_str("\"unisex\"").unwrap();
        assert_eq!(parsed, Category::Unisex);
    }
}
