use thiserror::Error;
use crate::payment::GatewayError;
use crate::product_actor::ProductError;
use super::config::ConfigError;

/// Errors that stop the system from starting or shutting down cleanly.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Payment gateway misconfigured: {0}")]
    Gateway(#[from] GatewayError),
    #[error("Catalog seed error: {0}")]
    Seed(String),
    #[error("Catalog error: {0}")]
    Catalog(#[from] ProductError),
    #[error("Actor task failed: {0}")]
    ActorTask(String),
}
