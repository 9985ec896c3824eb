//! Payment gateway seam: the charge/refund capability and a sandbox implementation.

pub mod gateway;
pub mod sandbox;

pub use gateway::*;
pub use sandbox::SandboxGateway;
