use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::Money;

/// Failures reported by a payment gateway.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// The configured keys are wrong. A configuration fault, never retried.
    #[error("Invalid gateway credentials: {0}")]
    InvalidCredentials(String),
    #[error("Charge declined: {0}")]
    Declined(String),
    #[error("Gateway unreachable: {0}")]
    Network(String),
    #[error("Gateway did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Successful,
    Refunded,
}

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub token: String,
    pub amount: Money,
    pub currency: String,
    pub description: String,
    /// Repeating a request with the same key must not charge twice.
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub charge_id: String,
    pub status: ChargeStatus,
    pub amount: Money,
    pub currency: String,
}

/// An external card-payment service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> Result<Receipt, GatewayError>;

    async fn refund(&self, charge_id: &str, amount: Money) -> Result<Receipt, GatewayError>;
}

/// Public/secret key pair issued by the gateway dashboard.
#[derive(Clone)]
pub struct GatewayKeys {
    pub public_key: String,
    pub secret_key: String,
}

impl GatewayKeys {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Keys must follow the gateway's scheme: `pkey_...` and `skey_...`.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !self.public_key.starts_with("pkey_") {
            return Err(GatewayError::InvalidCredentials("invalid public key".to_string()));
        }
        if !self.secret_key.starts_with("skey_") {
            return Err(GatewayError::InvalidCredentials("invalid secret key".to_string()));
        }
        Ok(())
    }
}

// Secret keys must never reach the logs.
impl std::fmt::Debug for GatewayKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayKeys")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
