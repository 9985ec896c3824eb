use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info, instrument};
use crate::actor_framework::ResourceActor;
use crate::checkout::CheckoutService;
use crate::clients::{OrderClient, ProductClient};
use crate::domain::{Order, Product};
use crate::payment::PaymentGateway;
use crate::store::Catalog;
use super::config::StoreConfig;
use super::error::SystemError;
use super::seed::{demo_catalog, load_catalog};

/// Id source for orders: `order_1`, `order_2`, ... never reused within a process.
pub fn order_id_generator() -> impl Fn() -> String + Send + Sync + 'static {
    let order_id_counter = Arc::new(AtomicU64::new(1));
    move || {
        let id = order_id_counter.fetch_add(1, Ordering::SeqCst);
        format!("order_{}", id)
    }
}

/// The running store: catalog and order actors plus the checkout built on them.
///
/// Responsible for starting up actors, seeding the catalog, wiring the
/// checkout, and handling shutdown.
pub struct StoreSystem {
    pub checkout: CheckoutService,
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreSystem {
    /// Starts the system with the catalog named by the configuration.
    #[instrument(name = "store_system", skip_all)]
    pub async fn start(config: &StoreConfig, gateway: Arc<dyn PaymentGateway>) -> Result<Self, SystemError> {
        config.payment_keys.validate()?;

        let products = match &config.catalog_path {
            Some(path) => load_catalog(path)?,
            None => demo_catalog(),
        };
        Self::start_with_catalog(config, gateway, products).await
    }

    /// Starts the system and seeds the catalog with `products`.
    pub async fn start_with_catalog(
        config: &StoreConfig,
        gateway: Arc<dyn PaymentGateway>,
        products: Vec<Product>,
    ) -> Result<Self, SystemError> {
        info!("Starting store system");

        // 1. Catalog
        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::with_supplied_ids(config.actor_buffer_size);
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Order store
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new(config.actor_buffer_size, order_id_generator());
        let order_client = OrderClient::new(order_resource_client);
        let order_handle = tokio::spawn(order_actor.run());

        let count = products.len();
        for product in products {
            product_client.insert(product).await?;
        }
        info!(products = count, "Catalog seeded");

        // 3. Checkout over the two stores
        let checkout = CheckoutService::new(
            Arc::new(product_client.clone()),
            Arc::new(order_client.clone()),
            gateway,
        )
        .with_currency(config.currency.clone())
        .with_gateway_timeout(config.gateway_timeout);

        info!("Store system started");
        Ok(Self {
            checkout,
            product_client,
            order_client,
            handles: vec![product_handle, order_handle],
        })
    }

    /// Drops every client so the actors' mailboxes close, then waits for them.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down store system");

        drop(self.checkout);
        drop(self.order_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::ActorTask(e.to_string()));
            }
        }

        info!("Store system shutdown complete");
        Ok(())
    }
}
