use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use crate::domain::Product;
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::actor_framework::ResourceClient;
use crate::store::Catalog;

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Decrement(quantity)).await {
            Ok(ProductActionResult::Decrement(remaining)) => {
                info!(remaining, "Stock decremented");
                Ok(remaining)
            }
            Ok(other) => Err(unexpected(other)),
            Err(e) => {
                let e = ProductError::from(e);
                warn!(error = %e, "Stock decrement refused");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Restock(quantity)).await? {
            ProductActionResult::Restock(level) => {
                info!(level, "Stock restored");
                Ok(level)
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn insert_product(&self, product: Product) -> Result<(), ProductError> {
        debug!("Sending request");
        self.inner.insert(product).await.map_err(ProductError::from)
    }
}

#[async_trait]
impl Catalog for ProductClient {
    async fn get(&self, id: &str) -> Result<Product, ProductError> {
        self.get_product(id.to_string())
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Product>, ProductError> {
        self.list_products().await
    }

    async fn decrement(&self, id: &str, amount: u32) -> Result<u32, ProductError> {
        self.decrement_stock(id.to_string(), amount).await
    }

    async fn restock(&self, id: &str, amount: u32) -> Result<u32, ProductError> {
        ProductClient::restock(self, id.to_string(), amount).await
    }

    async fn insert(&self, product: Product) -> Result<(), ProductError> {
        self.insert_product(product).await
    }
}
