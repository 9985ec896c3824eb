//! Store configuration.
//!
//! Loaded from environment variables, after a `.env` file in the working
//! directory (if any) has been applied.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use crate::checkout::{DEFAULT_CURRENCY, DEFAULT_GATEWAY_TIMEOUT};
use crate::payment::GatewayKeys;

pub const DEFAULT_ACTOR_BUFFER_SIZE: usize = 32;

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Gateway key pair (`PAYMENT_PUBLIC_KEY`, `PAYMENT_SECRET_KEY`)
    pub payment_keys: GatewayKeys,

    /// Charge currency (`PAYMENT_CURRENCY`, default `thb`)
    pub currency: String,

    /// Upper bound on a single gateway call (`GATEWAY_TIMEOUT_MS`)
    pub gateway_timeout: Duration,

    /// Mailbox size of each store actor (`ACTOR_BUFFER_SIZE`)
    pub actor_buffer_size: usize,

    /// JSON product list to seed the catalog from (`CATALOG_PATH`).
    /// The built-in demo products are used when unset.
    pub catalog_path: Option<PathBuf>,
}

/// Configuration error types.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

impl StoreConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
        };

        let payment_keys = GatewayKeys::new(required("PAYMENT_PUBLIC_KEY")?, required("PAYMENT_SECRET_KEY")?);

        let gateway_timeout = match lookup("GATEWAY_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse()
                    .map_err(|_| ConfigError::InvalidValue("GATEWAY_TIMEOUT_MS".to_string()))?,
            ),
            None => DEFAULT_GATEWAY_TIMEOUT,
        };
        if gateway_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("GATEWAY_TIMEOUT_MS".to_string()));
        }

        let actor_buffer_size = match lookup("ACTOR_BUFFER_SIZE") {
            Some(size) => size
                .parse()
                .ok()
                .filter(|size: &usize| *size > 0)
                .ok_or_else(|| ConfigError::InvalidValue("ACTOR_BUFFER_SIZE".to_string()))?,
            None => DEFAULT_ACTOR_BUFFER_SIZE,
        };

        Ok(StoreConfig {
            payment_keys,
            currency: lookup("PAYMENT_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            gateway_timeout,
            actor_buffer_size,
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
        })
    }
}
