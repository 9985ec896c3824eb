use thiserror::Error;
use crate::domain::OrderStatus;
use crate::order_actor::OrderError;
use crate::payment::GatewayError;
use crate::product_actor::ProductError;

/// Errors returned by the checkout API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invalid item {product_id}: {reason}")]
    InvalidItem { product_id: String, reason: String },
    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock { product_id: String, requested: u32, available: u32 },
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Order {order_id} already closed (status {status})")]
    OrderNotPending { order_id: String, status: OrderStatus },
    #[error("Payment for order {0} is already in progress")]
    PaymentInProgress(String),
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalStatusTransition { from: OrderStatus, to: OrderStatus },
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
    /// The charge went through but stock could not be taken for `product_id`.
    #[error("Fulfillment conflict on order {order_id} for {product_id} (refunded: {refunded})")]
    FulfillmentConflict { order_id: String, product_id: String, refunded: bool },
    #[error("Order total overflows")]
    AmountOverflow,
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CheckoutError {
    /// Validation and lookup failures caused by the request itself (4xx class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::EmptyCart
                | CheckoutError::InvalidItem { .. }
                | CheckoutError::InvalidCustomer(_)
                | CheckoutError::InsufficientStock { .. }
                | CheckoutError::OrderNotFound(_)
                | CheckoutError::OrderNotPending { .. }
                | CheckoutError::PaymentInProgress(_)
                | CheckoutError::IllegalStatusTransition { .. }
                | CheckoutError::AmountOverflow
                | CheckoutError::Gateway(GatewayError::Declined(_))
        )
    }

    pub(crate) fn from_order(order_id: &str, err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => CheckoutError::OrderNotFound(id),
            OrderError::NotPending(status) => CheckoutError::OrderNotPending {
                order_id: order_id.to_string(),
                status,
            },
            OrderError::PaymentInFlight => CheckoutError::PaymentInProgress(order_id.to_string()),
            OrderError::IllegalStatusTransition { from, to } => {
                CheckoutError::IllegalStatusTransition { from, to }
            }
            other => CheckoutError::Storage(other.to_string()),
        }
    }

    pub(crate) fn from_product(product_id: &str, err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => CheckoutError::InvalidItem {
                product_id: product_id.to_string(),
                reason: "unknown product".to_string(),
            },
            ProductError::InsufficientStock { requested, available } => CheckoutError::InsufficientStock {
                product_id: product_id.to_string(),
                requested,
                available,
            },
            ProductError::InvalidQuantity(qty) => CheckoutError::InvalidItem {
                product_id: product_id.to_string(),
                reason: format!("invalid quantity {}", qty),
            },
            other => CheckoutError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        assert!(CheckoutError::EmptyCart.is_client_error());
        assert!(CheckoutError::OrderNotFound("order_1".into()).is_client_error());
        assert!(CheckoutError::Gateway(GatewayError::Declined("no".into())).is_client_error());
        assert!(!CheckoutError::Gateway(GatewayError::Network("down".into())).is_client_error());
        assert!(!CheckoutError::FulfillmentConflict {
            order_id: "order_1".into(),
            product_id: "1234".into(),
            refunded: true,
        }
        .is_client_error());
    }

    #[test]
    fn order_errors_keep_their_meaning() {
        assert_eq!(
            CheckoutError::from_order("order_1", OrderError::NotPending(OrderStatus::Paid)),
            CheckoutError::OrderNotPending { order_id: "order_1".into(), status: OrderStatus::Paid }
        );
        assert_eq!(
            CheckoutError::from_order("order_1", OrderError::PaymentInFlight),
            CheckoutError::PaymentInProgress("order_1".into())
        );
    }

    #[test]
    fn unknown_product_is_an_invalid_item() {
        assert!(matches!(
            CheckoutError::from_product("zzz", ProductError::NotFound("zzz".into())),
            CheckoutError::InvalidItem { .. }
        ));
    }
}
