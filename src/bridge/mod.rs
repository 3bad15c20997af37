//! Bridge Links
//!
//! Bridge links to neighboring brokers and the spanning-tree role registries
//! kept for each of them.
//!
//! # Example Configuration
//!
//! ```toml
//! [broker]
//! address = "10.0.0.1"
//! port = 1883
//! process_id = 42
//!
//! [[bridge]]
//! name = "edge-b"
//! address = "10.0.0.2"
//! port = 1884
//! ```

mod link;
mod manager;

#[cfg(test)]
mod tests;

pub use link::{Bridge, BridgeSnapshot};
pub use manager::{BridgeError, BridgeManager};

// Re-export config types from the config module for convenience
pub use crate::config::BridgeConfig;
