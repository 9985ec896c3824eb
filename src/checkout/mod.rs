//! Cart submission, payment confirmation and fulfillment.

pub mod error;
mod service;

pub use error::*;
pub use service::*;
