use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderStatus};
use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;

impl Order {
    fn transition(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::IllegalStatusTransition { from: self.status, to: next });
        }
        self.status = next;
        Ok(())
    }

    fn require_claim(&self) -> Result<(), OrderError> {
        if self.payment_in_flight {
            Ok(())
        } else {
            Err(OrderError::NoPaymentClaim)
        }
    }
}

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = OrderStatus;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order is always initialized as pending with no payment attempt.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        Ok(Self {
            id,
            purchases: params.purchases,
            status: OrderStatus::Pending,
            owner: params.owner,
            amount: params.amount,
            currency: params.currency,
            charge_id: None,
            payment_in_flight: false,
            fulfilled: false,
            created_at: Utc::now(),
        })
    }

    fn on_create(&mut self) -> Result<(), OrderError> {
        if self.purchases.is_empty() {
            return Err(OrderError::ValidationError("order has no purchases".to_string()));
        }
        if let Some((product_id, _)) = self.purchases.iter().find(|(_, qty)| **qty == 0) {
            return Err(OrderError::ValidationError(format!("zero quantity for {}", product_id)));
        }
        if self.amount.is_negative() {
            return Err(OrderError::ValidationError(format!("negative amount {}", self.amount)));
        }
        Ok(())
    }

    /// Moves the order to a new status.
    ///
    /// # Errors
    /// Refuses anything but the forward transitions, and any change while a
    /// payment attempt owns the order.
    fn on_update(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if self.payment_in_flight {
            return Err(OrderError::PaymentInFlight);
        }
        self.transition(next)
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::ClaimPayment => {
                if self.status != OrderStatus::Pending {
                    return Err(OrderError::NotPending(self.status));
                }
                if self.payment_in_flight {
                    return Err(OrderError::PaymentInFlight);
                }
                self.payment_in_flight = true;
            }
            OrderAction::ReleasePayment => {
                self.require_claim()?;
                self.payment_in_flight = false;
            }
            OrderAction::MarkPaid { charge_id } => {
                self.require_claim()?;
                self.transition(OrderStatus::Paid)?;
                self.charge_id = Some(charge_id);
                self.payment_in_flight = false;
            }
            OrderAction::RejectPayment => {
                self.require_claim()?;
                self.transition(OrderStatus::Cancelled)?;
                self.payment_in_flight = false;
            }
            OrderAction::MarkFulfilled => {
                if self.status != OrderStatus::Paid {
                    return Err(OrderError::NotPaid(self.status));
                }
                self.fulfilled = true;
            }
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use crate::domain::{Customer, Money};

    fn pending_order() -> Order {
        let params = OrderCreate {
            purchases: BTreeMap::from([("1234".to_string(), 2)]),
            owner: Customer::new("Alice", "Smith", "alice@example.com"),
            amount: Money::from_minor(3600),
            currency: "thb".to_string(),
        };
        Order::from_create_params("order_1".to_string(), params).unwrap()
    }

    #[test]
    fn new_orders_are_pending() {
        let order = pending_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.payment_in_flight);
        assert_eq!(order.payment_key(), "order-order_1");
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let mut order = pending_order();
        assert_eq!(
            order.on_update(OrderStatus::Refunded).unwrap_err(),
            OrderError::IllegalStatusTransition { from: OrderStatus::Pending, to: OrderStatus::Refunded }
        );

        order.on_update(OrderStatus::Cancelled).unwrap();
        assert_eq!(
            order.on_update(OrderStatus::Paid).unwrap_err(),
            OrderError::IllegalStatusTransition { from: OrderStatus::Cancelled, to: OrderStatus::Paid }
        );
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn claim_is_exclusive() {
        let mut order = pending_order();
        order.handle_action(OrderAction::ClaimPayment).unwrap();
        assert_eq!(
            order.handle_action(OrderAction::ClaimPayment).unwrap_err(),
            OrderError::PaymentInFlight
        );
        assert_eq!(order.on_update(OrderStatus::Cancelled).unwrap_err(), OrderError::PaymentInFlight);

        order.handle_action(OrderAction::ReleasePayment).unwrap();
        assert!(order.handle_action(OrderAction::ClaimPayment).is_ok());
    }

    #[test]
    fn mark_paid_requires_claim_and_records_charge() {
        let mut order = pending_order();
        assert_eq!(
            order.handle_action(OrderAction::MarkPaid { charge_id: "chrg_1".into() }).unwrap_err(),
            OrderError::NoPaymentClaim
        );

        order.handle_action(OrderAction::ClaimPayment).unwrap();
        let paid = order.handle_action(OrderAction::MarkPaid { charge_id: "chrg_1".into() }).unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.charge_id.as_deref(), Some("chrg_1"));
        assert!(!paid.payment_in_flight);

        assert_eq!(
            order.handle_action(OrderAction::ClaimPayment).unwrap_err(),
            OrderError::NotPending(OrderStatus::Paid)
        );
    }

    #[test]
    fn reject_cancels_the_order() {
        let mut order = pending_order();
        order.handle_action(OrderAction::ClaimPayment).unwrap();
        let rejected = order.handle_action(OrderAction::RejectPayment).unwrap();
        assert_eq!(rejected.status, OrderStatus::Cancelled);
        assert!(!rejected.payment_in_flight);
    }

    #[test]
    fn only_paid_orders_are_fulfilled() {
        let mut order = pending_order();
        assert_eq!(
            order.handle_action(OrderAction::MarkFulfilled).unwrap_err(),
            OrderError::NotPaid(OrderStatus::Pending)
        );

        order.handle_action(OrderAction::ClaimPayment).unwrap();
        order.handle_action(OrderAction::MarkPaid { charge_id: "chrg_1".into() }).unwrap();
        assert!(!order.fulfilled);
        let fulfilled = order.handle_action(OrderAction::MarkFulfilled).unwrap();
        assert!(fulfilled.fulfilled);
        assert_eq!(fulfilled.status, OrderStatus::Paid);
    }

    #[test]
    fn empty_orders_fail_creation() {
        let mut order = pending_order();
        order.purchases.clear();
        assert!(matches!(order.on_create(), Err(OrderError::ValidationError(_))));
    }
}
