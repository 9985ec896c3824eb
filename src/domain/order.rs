use std::collections::BTreeMap;
use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::{Customer, Money};

/// Lifecycle of an order. Transitions only move forward:
/// `Pending -> Paid | Cancelled` and `Paid -> Refunded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Refunded)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        };
        f.write_str(name)
    }
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Product id -> quantity, every quantity > 0.
    pub purchases: BTreeMap<String, u32>,
    pub status: OrderStatus,
    pub owner: Customer,
    /// Server-computed charge amount, locked when the order is created.
    pub amount: Money,
    pub currency: String,
    pub charge_id: Option<String>,
    /// Set while one payment attempt owns the order.
    pub payment_in_flight: bool,
    /// Stock has been taken for every line.
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new order. There is no status field: every order
/// starts out pending.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub purchases: BTreeMap<String, u32>,
    pub owner: Customer,
    pub amount: Money,
    pub currency: String,
}

impl Order {
    /// Idempotency key sent with every charge attempt for this order.
    pub fn payment_key(&self) -> String {
        format!("order-{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_transitions_are_legal() {
        use OrderStatus::*;
        let all = [Pending, Paid, Cancelled, Refunded];
        let legal = [(Pending, Paid), (Pending, Cancelled), (Paid, Refunded)];

        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    legal.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderStatus::Refunded).unwrap(), "\"refunded\"");
    }
}
