use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use crate::domain::Money;
use super::gateway::{ChargeRequest, ChargeStatus, GatewayError, GatewayKeys, PaymentGateway, Receipt};

/// Token the sandbox always declines.
pub const DECLINED_TOKEN: &str = "tokn_test_declined";

#[derive(Default)]
struct Ledger {
    by_key: HashMap<String, Receipt>,
    charges: HashMap<String, Receipt>,
}

/// In-process stand-in for the card gateway, used for local runs and tests.
///
/// Accepts tokens starting with `tokn_` except [`DECLINED_TOKEN`], replays the
/// stored receipt when an idempotency key repeats, and can delay every call to
/// simulate a slow gateway.
pub struct SandboxGateway {
    keys: GatewayKeys,
    latency: Duration,
    ledger: Mutex<Ledger>,
}

impl SandboxGateway {
    pub fn new(keys: GatewayKeys) -> Self {
        Self {
            keys,
            latency: Duration::ZERO,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[cfg(test)]
impl SandboxGateway {
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of distinct charges taken so far.
    pub async fn charge_count(&self) -> usize {
        self.ledger.lock().await.charges.len()
    }

    pub async fn receipt(&self, charge_id: &str) -> Option<Receipt> {
        self.ledger.lock().await.charges.get(charge_id).cloned()
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    #[instrument(skip(self, request), fields(amount = %request.amount, key = %request.idempotency_key))]
    async fn charge(&self, request: ChargeRequest) -> Result<Receipt, GatewayError> {
        self.keys.validate()?;
        self.simulate_latency().await;

        let mut ledger = self.ledger.lock().await;
        if let Some(receipt) = ledger.by_key.get(&request.idempotency_key) {
            info!(charge_id = %receipt.charge_id, "Replaying receipt for repeated idempotency key");
            return Ok(receipt.clone());
        }
        if !request.token.starts_with("tokn_") {
            warn!("Malformed card token");
            return Err(GatewayError::Declined("invalid card token".to_string()));
        }
        if request.token == DECLINED_TOKEN {
            return Err(GatewayError::Declined("card declined by issuer".to_string()));
        }
        if request.amount <= Money::ZERO {
            return Err(GatewayError::Declined(format!("invalid amount {}", request.amount)));
        }

        let receipt = Receipt {
            charge_id: format!("chrg_test_{}", Uuid::new_v4().simple()),
            status: ChargeStatus::Successful,
            amount: request.amount,
            currency: request.currency,
        };
        ledger.by_key.insert(request.idempotency_key, receipt.clone());
        ledger.charges.insert(receipt.charge_id.clone(), receipt.clone());
        debug!(charge_id = %receipt.charge_id, "Charge created");
        Ok(receipt)
    }

    #[instrument(skip(self))]
    async fn refund(&self, charge_id: &str, amount: Money) -> Result<Receipt, GatewayError> {
        self.keys.validate()?;
        self.simulate_latency().await;

        let mut ledger = self.ledger.lock().await;
        let charge = ledger
            .charges
            .get_mut(charge_id)
            .ok_or_else(|| GatewayError::Declined(format!("unknown charge {}", charge_id)))?;
        if charge.status == ChargeStatus::Refunded {
            return Err(GatewayError::Declined(format!("charge {} already refunded", charge_id)));
        }
        if amount > charge.amount {
            return Err(GatewayError::Declined(format!("refund {} exceeds charge {}", amount, charge.amount)));
        }
        charge.status = ChargeStatus::Refunded;
        Ok(Receipt {
            charge_id: charge.charge_id.clone(),
            status: ChargeStatus::Refunded,
            amount,
            currency: charge.currency.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SandboxGateway {
        SandboxGateway::new(GatewayKeys::new("pkey_test_1", "skey_test_1"))
    }

    fn request(token: &str, key: &str) -> ChargeRequest {
        ChargeRequest {
            token: token.to_string(),
            amount: Money::from_minor(3600),
            currency: "thb".to_string(),
            description: "test".to_string(),
            idempotency_key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn repeated_key_charges_once() {
        let gateway = gateway();
        let first = gateway.charge(request("tokn_test_1", "order-order_1")).await.unwrap();
        let second = gateway.charge(request("tokn_test_1", "order-order_1")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(gateway.charge_count().await, 1);
    }

    #[tokio::test]
    async fn declines_bad_tokens() {
        let gateway = gateway();
        assert!(matches!(
            gateway.charge(request(DECLINED_TOKEN, "k1")).await,
            Err(GatewayError::Declined(_))
        ));
        assert!(matches!(
            gateway.charge(request("4242424242424242", "k2")).await,
            Err(GatewayError::Declined(_))
        ));
        assert_eq!(gateway.charge_count().await, 0);
    }

    #[tokio::test]
    async fn bad_keys_are_invalid_credentials() {
        let gateway = SandboxGateway::new(GatewayKeys::new("pkey_test_1", "nope"));
        assert!(matches!(
            gateway.charge(request("tokn_test_1", "k")).await,
            Err(GatewayError::InvalidCredentials(_))
        ));
    }

    #[tokio::test]
    async fn refund_only_once() {
        let gateway = gateway();
        let receipt = gateway.charge(request("tokn_test_1", "k")).await.unwrap();

        let refund = gateway.refund(&receipt.charge_id, receipt.amount).await.unwrap();
        assert_eq!(refund.status, ChargeStatus::Refunded);
        assert!(gateway.refund(&receipt.charge_id, receipt.amount).await.is_err());
    }
}
