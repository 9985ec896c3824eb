use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::domain::OrderStatus;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalStatusTransition { from: OrderStatus, to: OrderStatus },
    #[error("Order is not pending (status {0})")]
    NotPending(OrderStatus),
    #[error("Order is not paid (status {0})")]
    NotPaid(OrderStatus),
    #[error("A payment attempt is already in progress")]
    PaymentInFlight,
    #[error("No payment attempt owns this order")]
    NoPaymentClaim,
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<OrderError>> for OrderError {
    fn from(err: FrameworkError<OrderError>) -> Self {
        match err {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Entity(e) => e,
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
