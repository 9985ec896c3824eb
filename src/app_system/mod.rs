//! System orchestration, configuration, startup, and shutdown logic.

pub mod store_system;
pub mod tracing;
pub mod config;
pub mod seed;
pub mod error;

pub use store_system::*;
pub use self::tracing::*;
pub use config::*;
pub use seed::*;
pub use error::*;
