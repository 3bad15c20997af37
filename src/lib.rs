//! stpbridge - Spanning-tree loop prevention for bridged broker meshes
//!
//! Brokers linked by bridges exchange advertisements naming the root broker
//! they believe in. Each advertisement classifies the link it arrived on so
//! that exactly one path toward the root carries authority and every other
//! redundant link is suppressed.

pub mod bridge;
pub mod config;
pub mod stp;

pub use bridge::{Bridge, BridgeError, BridgeManager, BridgeSnapshot};
pub use config::{BridgeConfig, Config};
pub use stp::{
    apply_advertisement, decide_role, Advertisement, BrokerIdentity, PortRole, ProtocolStatus,
    RawAdvertisement, SharedStatus, StpError,
};
