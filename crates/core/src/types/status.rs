//! Status and payment enums for orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a status or payment method from a string.
#[derive(Debug, Clone, Error)]
#[error("unknown value: {0}")]
pub struct ParseStatusError(pub String);

/// Order lifecycle status.
///
/// This is the single closed vocabulary for order state. Historical rows
/// written as `processing` by an earlier admin panel deserialize as
/// [`OrderStatus::Confirmed`] and are never written back in the old
/// spelling.
///
/// Transitions are deliberately free-form: the admin panel may set any
/// status from any non-terminal status, with `cancelled` reachable from all
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(alias = "processing")]
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order. Used to build admin selectors.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Whether the order can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            // Legacy admin spelling, folded into the closed vocabulary.
            "confirmed" | "processing" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// How the customer pays for an order.
///
/// Carried as data only; no gateway integration happens in this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    Bkash,
    Sslcommerz,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cod => write!(f, "cod"),
            Self::Bkash => write!(f, "bkash"),
            Self::Sslcommerz => write!(f, "sslcommerz"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::Cod),
            "bkash" => Ok(Self::Bkash),
            "sslcommerz" => Ok(Self::Sslcommerz),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_processing_alias_parses_as_confirmed() {
        let parsed: OrderStatus = "processing".parse().unwrap();
        assert_eq!(parsed, OrderStatus::Confirmed);

        let from_json: OrderStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(from_json, OrderStatus::Confirmed);
    }

    #[test]
    fn test_confirmed_never_serializes_as_processing() {
        let json = serde_json::to_string(&OrderStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Confirmed.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_payment_method_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Bkash).unwrap(),
            "\"bkash\""
        );
        let parsed: PaymentMethod = "sslcommerz".parse().unwrap();
        assert_eq!(parsed, PaymentMethod::Sslcommerz);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
