mod domain;
mod clients;
mod store;
mod payment;
mod checkout;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod product_actor;
mod order_actor;

use std::sync::Arc;
use tracing::{error, info, Instrument};
use crate::app_system::{setup_tracing, StoreConfig, StoreSystem, SystemError};
use crate::domain::{CartLine, CartSubmission, Customer, Money};
use crate::payment::SandboxGateway;

const DEFAULT_DEMO_TOKEN: &str = "tokn_test_5086xl7c9k5b";

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Loads .env before the subscriber reads RUST_LOG
    let config = StoreConfig::load()?;
    setup_tracing();

    info!(currency = %config.currency, timeout = ?config.gateway_timeout, "Starting storefront");

    let gateway = Arc::new(SandboxGateway::new(config.payment_keys.clone()));
    let system = StoreSystem::start(&config, gateway).await?;

    // The storefront page shows its own total; the server recomputes it anyway.
    let mut page_total = Money::ZERO;
    match system.checkout.list_products().await {
        Ok(products) => {
            for product in &products {
                info!(product_id = %product.id, name = %product.name, price = %product.unit_price, stock = product.available_quantity, "Catalog entry");
                if product.id == "1234" {
                    page_total = product.unit_price.checked_mul(2).unwrap_or(Money::ZERO);
                }
            }
        }
        Err(e) => error!(error = %e, "Failed to list catalog"),
    }

    let cart = CartSubmission::new(vec![CartLine::new("1234", 2)], alice()).with_client_total(page_total);

    let span = tracing::info_span!("cart_submission");
    let submitted = async {
        info!("Submitting demo cart");
        system.checkout.submit_cart(cart).await
    }
    .instrument(span)
    .await;

    let mut paid_order = None;
    match submitted {
        Ok(submitted) => {
            info!(order_id = %submitted.order_id, amount = %submitted.amount, "Order awaiting payment");

            let token = std::env::var("DEMO_CARD_TOKEN").unwrap_or_else(|_| DEFAULT_DEMO_TOKEN.to_string());
            let span = tracing::info_span!("payment", order_id = %submitted.order_id);
            let confirmed = async { system.checkout.confirm_payment(&submitted.order_id, &token).await }
                .instrument(span)
                .await;

            match confirmed {
                Ok(confirmation) => {
                    info!(
                        order_id = %confirmation.order_id,
                        status = %confirmation.status,
                        charge_id = %confirmation.receipt.charge_id,
                        "Payment confirmed"
                    );
                    paid_order = Some(confirmation.order_id);
                }
                Err(e) => error!(error = %e, client_error = e.is_client_error(), "Payment failed"),
            }
        }
        Err(e) => error!(error = %e, "Cart rejected"),
    }
    log_stock(&system, "1234").await;

    // A second customer abandons the payment page.
    let abandoned = CartSubmission::new(vec![CartLine::new("44fc", 1)], Customer::new("Bob", "Jones", "bob@example.com"));
    match system.checkout.submit_cart(abandoned).await {
        Ok(submitted) => match system.checkout.cancel_order(&submitted.order_id).await {
            Ok(order) => info!(order_id = %order.id, status = %order.status, "Order cancelled"),
            Err(e) => error!(error = %e, "Cancel failed"),
        },
        Err(e) => error!(error = %e, "Cart rejected"),
    }

    // The first customer returns the items.
    if let Some(order_id) = paid_order {
        let span = tracing::info_span!("refund", order_id = %order_id);
        match system.checkout.refund_order(&order_id).instrument(span).await {
            Ok(order) => info!(order_id = %order.id, status = %order.status, "Order refunded"),
            Err(e) => error!(error = %e, "Refund failed"),
        }
        log_stock(&system, "1234").await;
    }

    match system.order_client.list_orders().await {
        Ok(orders) => {
            for order in &orders {
                info!(order_id = %order.id, status = %order.status, amount = %order.amount, "Final order state");
            }
        }
        Err(e) => error!(error = %e, "Failed to list orders"),
    }

    system.shutdown().await?;

    info!("Storefront demo completed");
    Ok(())
}

fn alice() -> Customer {
    Customer::new("Alice", "Smith", "alice@example.com")
}

async fn log_stock(system: &StoreSystem, product_id: &str) {
    match system.product_client.check_stock(product_id.to_string()).await {
        Ok(level) => info!(product_id, level, "Remaining stock"),
        Err(e) => error!(error = %e, "Failed to read stock"),
    }
}
