//! Typed handles over the resource actors.

#[macro_use]
mod macros;
mod product_client;
mod order_client;

pub use product_client::ProductClient;
pub use order_client::OrderClient;
