//! Order-specific domain logic: status transitions and payment ownership.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
