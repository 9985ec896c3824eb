use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use crate::domain::{CartSubmission, Money, Order, OrderCreate, OrderStatus, Product};
use crate::payment::{ChargeRequest, GatewayError, PaymentGateway, Receipt};
use crate::store::{Catalog, OrderStore};
use super::error::CheckoutError;

pub const DEFAULT_CURRENCY: &str = "thb";
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Returned by [`CheckoutService::submit_cart`]: the pending order and the
/// amount it will be charged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedOrder {
    pub order_id: String,
    pub amount: Money,
    pub currency: String,
}

/// Returned by [`CheckoutService::confirm_payment`] once the order is paid and fulfilled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub status: OrderStatus,
    pub receipt: Receipt,
}

/// Turns a cart into a charged, fulfilled order.
///
/// The flow per order is `Received -> Validated -> PendingPayment` in
/// [`submit_cart`](Self::submit_cart), then `Charged -> Fulfilled` or
/// `Rejected` in [`confirm_payment`](Self::confirm_payment).
///
/// Amounts always come from catalog prices at submission time and are locked on
/// the order; the client only ever supplies a card token.
#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<dyn Catalog>,
    orders: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
    gateway_timeout: Duration,
}

impl CheckoutService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        orders: Arc<dyn OrderStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            catalog,
            orders,
            gateway,
            currency: DEFAULT_CURRENCY.to_string(),
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CheckoutError> {
        self.catalog
            .list()
            .await
            .map_err(|e| CheckoutError::Storage(e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> Result<Order, CheckoutError> {
        self.orders
            .get(order_id)
            .await
            .map_err(|e| CheckoutError::from_order(order_id, e))
    }

    /// Validates the cart against the catalog and creates a pending order.
    ///
    /// Stock is only checked here, not reserved; it is taken when the payment
    /// succeeds.
    #[instrument(skip(self, cart), fields(lines = cart.lines.len(), customer_email = %cart.customer.email))]
    pub async fn submit_cart(&self, cart: CartSubmission) -> Result<SubmittedOrder, CheckoutError> {
        info!("Processing cart submission");

        if cart.lines.is_empty() {
            warn!("Rejected empty cart");
            return Err(CheckoutError::EmptyCart);
        }
        cart.customer.validate().map_err(CheckoutError::InvalidCustomer)?;

        let purchases = cart
            .merged_lines()
            .map_err(|(product_id, reason)| CheckoutError::InvalidItem { product_id, reason })?;

        let mut amount = Money::ZERO;
        for (product_id, &quantity) in &purchases {
            let product = self
                .catalog
                .get(product_id)
                .await
                .map_err(|e| CheckoutError::from_product(product_id, e))?;

            if quantity > product.available_quantity {
                warn!(product_id = %product_id, quantity, available = product.available_quantity, "Not enough stock");
                return Err(CheckoutError::InvalidItem {
                    product_id: product_id.clone(),
                    reason: format!(
                        "requested {}, only {} available",
                        quantity, product.available_quantity
                    ),
                });
            }

            let line_total = product
                .unit_price
                .checked_mul(quantity)
                .ok_or(CheckoutError::AmountOverflow)?;
            amount = amount.checked_add(line_total).ok_or(CheckoutError::AmountOverflow)?;
        }

        if let Some(client_total) = cart.client_total {
            if client_total != amount {
                warn!(client_total = %client_total, server_total = %amount, "Ignoring client-supplied total");
            }
        }

        let order_id = self
            .orders
            .create(OrderCreate {
                purchases,
                owner: cart.customer,
                amount,
                currency: self.currency.clone(),
            })
            .await
            .map_err(|e| CheckoutError::Storage(e.to_string()))?;

        info!(order_id = %order_id, amount = %amount, "Order created, awaiting payment");
        Ok(SubmittedOrder {
            order_id,
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Charges the order's locked amount to the card token and fulfills it.
    ///
    /// # Errors
    /// - `OrderNotPending` / `PaymentInProgress` when the order cannot be paid now
    /// - `Gateway(..)` on a gateway failure. A decline cancels the order; a
    ///   timeout, network or credentials failure leaves it pending.
    /// - `FulfillmentConflict` when stock ran out after the charge. The charge is
    ///   refunded and the order ends `refunded`, unless the refund failed too.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn confirm_payment(&self, order_id: &str, token: &str) -> Result<PaymentConfirmation, CheckoutError> {
        let order = self
            .orders
            .claim_payment(order_id)
            .await
            .map_err(|e| CheckoutError::from_order(order_id, e))?;
        info!(amount = %order.amount, "Payment claimed, charging card");

        let request = ChargeRequest {
            token: token.to_string(),
            amount: order.amount,
            currency: order.currency.clone(),
            description: format!("Storefront order {}", order.id),
            idempotency_key: order.payment_key(),
        };

        let receipt = match self.call_gateway(self.gateway.charge(request)).await {
            Ok(receipt) => receipt,
            Err(err) => return Err(self.abandon_payment(&order, err).await),
        };

        let paid = match self.orders.mark_paid(order_id, &receipt.charge_id).await {
            Ok(paid) => paid,
            Err(e) => {
                error!(charge_id = %receipt.charge_id, error = %e, "Charge taken but order could not be marked paid");
                // A retry replays this charge through the idempotency key.
                if let Err(release) = self.orders.release_payment(order_id).await {
                    error!(charge_id = %receipt.charge_id, error = %release, "Failed to release payment claim");
                }
                return Err(CheckoutError::Storage(e.to_string()));
            }
        };
        info!(charge_id = %receipt.charge_id, "Order paid");

        self.fulfill(&paid, &receipt).await?;

        let order = match self.orders.mark_fulfilled(order_id).await {
            Ok(fulfilled) => fulfilled,
            Err(e) => {
                error!(charge_id = %receipt.charge_id, error = %e, "Stock taken but order not marked fulfilled");
                paid
            }
        };

        info!("Order fulfilled");
        Ok(PaymentConfirmation {
            order_id: order.id,
            status: order.status,
            receipt,
        })
    }

    /// Customer-initiated cancellation of an unpaid order.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> Result<Order, CheckoutError> {
        let order = self
            .orders
            .update_status(order_id, OrderStatus::Cancelled)
            .await
            .map_err(|e| CheckoutError::from_order(order_id, e))?;
        info!("Order cancelled");
        Ok(order)
    }

    /// Refunds a paid order. Stock is put back only if the order was fulfilled.
    #[instrument(skip(self))]
    pub async fn refund_order(&self, order_id: &str) -> Result<Order, CheckoutError> {
        let order = self.get_order(order_id).await?;
        if order.status != OrderStatus::Paid {
            return Err(CheckoutError::IllegalStatusTransition {
                from: order.status,
                to: OrderStatus::Refunded,
            });
        }
        let charge_id = order
            .charge_id
            .clone()
            .ok_or_else(|| CheckoutError::Storage(format!("paid order {} has no charge", order_id)))?;

        self.call_gateway(self.gateway.refund(&charge_id, order.amount)).await?;

        let refunded = self
            .orders
            .update_status(order_id, OrderStatus::Refunded)
            .await
            .map_err(|e| CheckoutError::from_order(order_id, e))?;
        if order.fulfilled {
            self.restock_lines(&order.id, order.purchases.iter().map(|(id, qty)| (id.as_str(), *qty)))
                .await;
        } else {
            warn!("Order was never fulfilled, stock left as is");
        }

        info!(charge_id = %charge_id, "Order refunded");
        Ok(refunded)
    }

    async fn call_gateway(
        &self,
        call: impl std::future::Future<Output = Result<Receipt, GatewayError>>,
    ) -> Result<Receipt, GatewayError> {
        match tokio::time::timeout(self.gateway_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.gateway_timeout)),
        }
    }

    /// Ends a failed payment attempt and returns the error for the caller.
    async fn abandon_payment(&self, order: &Order, err: GatewayError) -> CheckoutError {
        let ended = match &err {
            GatewayError::Declined(reason) => {
                info!(reason = %reason, "Charge declined, cancelling order");
                self.orders.reject_payment(&order.id).await
            }
            GatewayError::InvalidCredentials(_) => {
                error!(error = %err, "Gateway rejected our credentials, check payment configuration");
                self.orders.release_payment(&order.id).await
            }
            GatewayError::Network(_) | GatewayError::Timeout(_) => {
                warn!(error = %err, "Charge outcome unknown, order left pending for retry");
                self.orders.release_payment(&order.id).await
            }
        };
        if let Err(e) = ended {
            error!(error = %e, "Failed to end payment attempt");
        }
        CheckoutError::Gateway(err)
    }

    /// Takes stock for every line of a paid order. On the first refusal the
    /// lines already taken are restocked and the charge is refunded.
    async fn fulfill(&self, order: &Order, receipt: &Receipt) -> Result<(), CheckoutError> {
        let mut taken: Vec<(&str, u32)> = Vec::with_capacity(order.purchases.len());

        for (product_id, &quantity) in &order.purchases {
            match self.catalog.decrement(product_id, quantity).await {
                Ok(remaining) => {
                    debug!(product_id = %product_id, quantity, remaining, "Stock taken");
                    taken.push((product_id.as_str(), quantity));
                }
                Err(e) => {
                    error!(product_id = %product_id, error = %e, "Stock unavailable after successful charge");
                    self.restock_lines(&order.id, taken).await;
                    let refunded = self.refund_after_conflict(order, receipt).await;
                    return Err(CheckoutError::FulfillmentConflict {
                        order_id: order.id.clone(),
                        product_id: product_id.clone(),
                        refunded,
                    });
                }
            }
        }
        Ok(())
    }

    async fn refund_after_conflict(&self, order: &Order, receipt: &Receipt) -> bool {
        if let Err(e) = self.call_gateway(self.gateway.refund(&receipt.charge_id, receipt.amount)).await {
            error!(
                order_id = %order.id,
                charge_id = %receipt.charge_id,
                error = %e,
                "Refund failed, order needs manual reconciliation"
            );
            return false;
        }
        match self.orders.update_status(&order.id, OrderStatus::Refunded).await {
            Ok(_) => {
                info!(order_id = %order.id, "Charge refunded after fulfillment conflict");
                true
            }
            Err(e) => {
                error!(order_id = %order.id, error = %e, "Charge refunded but order status not updated");
                true
            }
        }
    }

    async fn restock_lines<'a>(&self, order_id: &str, lines: impl IntoIterator<Item = (&'a str, u32)>) {
        for (product_id, quantity) in lines {
            if let Err(e) = self.catalog.restock(product_id, quantity).await {
                error!(order_id = %order_id, product_id = %product_id, quantity, error = %e, "Restock failed");
            }
        }
    }
}
