pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;

pub use client::{RelayClient, RelayTransport};
pub use config::RelayConfig;
pub use coordinator::RelayCoordinator;
pub use error::{RelayError, Result};
