//! Storage seams used by the checkout flow.
//!
//! The checkout only ever talks to these traits. The actor-backed
//! [`ProductClient`](crate::clients::ProductClient) and
//! [`OrderClient`](crate::clients::OrderClient) are the in-memory
//! implementations; a database-backed catalog or order store plugs in by
//! implementing the same traits with the same atomicity per call.

use async_trait::async_trait;
use crate::domain::{Order, OrderCreate, OrderStatus, Product};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;

#[async_trait]
pub trait Catalog: Send + Sync {
    /// ## Errors
    /// - `ProductError::NotFound` for an unknown id
    async fn get(&self, id: &str) -> Result<Product, ProductError>;

    async fn list(&self) -> Result<Vec<Product>, ProductError>;

    /// Atomically removes `amount` units and returns the remaining stock.
    ///
    /// ## Errors
    /// - `ProductError::InsufficientStock` if the stock would go negative; the
    ///   stock is left unchanged
    async fn decrement(&self, id: &str, amount: u32) -> Result<u32, ProductError>;

    /// Returns `amount` units taken by an order that was not fulfilled.
    async fn restock(&self, id: &str, amount: u32) -> Result<u32, ProductError>;

    /// Adds a record loaded from the persistent catalog.
    async fn insert(&self, product: Product) -> Result<(), ProductError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Stores a new pending order under a fresh, never reused id.
    async fn create(&self, order: OrderCreate) -> Result<String, OrderError>;

    async fn get(&self, id: &str) -> Result<Order, OrderError>;

    /// ## Errors
    /// - `OrderError::IllegalStatusTransition` for anything but a forward move
    /// - `OrderError::PaymentInFlight` while a payment attempt owns the order
    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, OrderError>;

    /// Marks the pending order as owned by one payment attempt.
    async fn claim_payment(&self, id: &str) -> Result<Order, OrderError>;

    async fn release_payment(&self, id: &str) -> Result<Order, OrderError>;

    async fn mark_paid(&self, id: &str, charge_id: &str) -> Result<Order, OrderError>;

    async fn reject_payment(&self, id: &str) -> Result<Order, OrderError>;

    /// Records that stock was taken for every line of a paid order.
    async fn mark_fulfilled(&self, id: &str) -> Result<Order, OrderError>;
}
