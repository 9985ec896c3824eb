use async_trait::async_trait;
use tracing::{debug, info, instrument};
use crate::domain::{Order, OrderCreate, OrderStatus};
use crate::order_actor::{OrderAction, OrderError};
use crate::actor_framework::ResourceClient;
use crate::store::OrderStore;

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl_basic_client!(OrderClient, Order, OrderError, order);

impl OrderClient {
    #[instrument(skip(self, params), fields(lines = params.purchases.len(), amount = %params.amount))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<String, OrderError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(order_id = %id, "Order stored");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: String, status: OrderStatus) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, status).await.map_err(OrderError::from)
    }

    #[instrument(skip(self))]
    pub async fn perform(&self, id: String, action: OrderAction) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.perform_action(id, action).await.map_err(OrderError::from)
    }
}

#[async_trait]
impl OrderStore for OrderClient {
    async fn create(&self, order: OrderCreate) -> Result<String, OrderError> {
        self.create_order(order).await
    }

    async fn get(&self, id: &str) -> Result<Order, OrderError> {
        self.get_order(id.to_string())
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, OrderError> {
        OrderClient::update_status(self, id.to_string(), status).await
    }

    async fn claim_payment(&self, id: &str) -> Result<Order, OrderError> {
        self.perform(id.to_string(), OrderAction::ClaimPayment).await
    }

    async fn release_payment(&self, id: &str) -> Result<Order, OrderError> {
        self.perform(id.to_string(), OrderAction::ReleasePayment).await
    }

    async fn mark_paid(&self, id: &str, charge_id: &str) -> Result<Order, OrderError> {
        self.perform(id.to_string(), OrderAction::MarkPaid { charge_id: charge_id.to_string() }).await
    }

    async fn reject_payment(&self, id: &str) -> Result<Order, OrderError> {
        self.perform(id.to_string(), OrderAction::RejectPayment).await
    }

    async fn mark_fulfilled(&self, id: &str) -> Result<Order, OrderError> {
        self.perform(id.to_string(), OrderAction::MarkFulfilled).await
    }
}
