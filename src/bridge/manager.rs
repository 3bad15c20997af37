//! Bridge Manager
//!
//! Owns every configured bridge link together with the broker-wide protocol
//! status, and routes inbound advertisements to the link they arrived on.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{error, info, warn};

use crate::config::BridgeConfig;
use crate::stp::{
    frame_advertisement, unframe_advertisement, Advertisement, PortRole, RawAdvertisement,
    SharedStatus, StpError,
};

use super::link::{Bridge, BridgeSnapshot};

/// Error type for bridge manager operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// No bridge with this name is configured
    UnknownBridge(String),
    /// The advertisement was rejected by the protocol
    Protocol(StpError),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::UnknownBridge(name) => write!(f, "Unknown bridge: {}", name),
            BridgeError::Protocol(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StpError> for BridgeError {
    fn from(e: StpError) -> Self {
        BridgeError::Protocol(e)
    }
}

/// Manages all bridge links for a broker
pub struct BridgeManager {
    status: SharedStatus,
    bridges: DashMap<String, Arc<Bridge>>,
}

impl BridgeManager {
    /// Create a new bridge manager
    pub fn new(status: SharedStatus) -> Self {
        Self {
            status,
            bridges: DashMap::new(),
        }
    }

    /// Create a bridge manager from configuration
    pub fn from_configs(status: SharedStatus, configs: &[BridgeConfig]) -> Self {
        let manager = Self::new(status);

        for config in configs {
            if config.enabled {
                manager.add_bridge(config);
            }
        }

        manager
    }

    /// Add a bridge link, replacing any existing link of the same name
    pub fn add_bridge(&self, config: &BridgeConfig) -> Arc<Bridge> {
        let bridge = Arc::new(Bridge::new(config));
        info!(
            "Bridge manager: Added bridge '{}' ({})",
            config.name,
            config.endpoint()
        );
        self.bridges.insert(config.name.clone(), bridge.clone());
        bridge
    }

    /// Tear down a bridge link, releasing its registries
    pub fn remove_bridge(&self, name: &str) -> Option<Arc<Bridge>> {
        let removed = self.bridges.remove(name).map(|(_, bridge)| bridge);
        if removed.is_some() {
            info!("Bridge manager: Removed bridge '{}'", name);
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<Arc<Bridge>> {
        self.bridges.get(name).map(|entry| entry.value().clone())
    }

    /// Shared protocol status
    pub fn protocol_status(&self) -> &SharedStatus {
        &self.status
    }

    /// Parse and apply a wire advertisement received on bridge `name`.
    ///
    /// Rejected advertisements are logged and discarded; the link stays up.
    pub fn apply(&self, name: &str, raw: RawAdvertisement) -> Result<PortRole, BridgeError> {
        // Clone the Arc out so the map shard is not held while applying
        let bridge = self
            .get(name)
            .ok_or_else(|| BridgeError::UnknownBridge(name.to_string()))?;

        let result = Advertisement::try_from(raw).and_then(|adv| bridge.apply(&self.status, &adv));

        result.map_err(|e| {
            if e.is_misconfiguration() {
                warn!("Bridge '{}': Discarding advertisement: {}", name, e);
            } else {
                error!("Bridge '{}': Protocol anomaly: {}", name, e);
            }
            BridgeError::Protocol(e)
        })
    }

    /// Decode a binary advertisement and apply it to bridge `name`
    pub fn apply_bytes(&self, name: &str, data: &[u8]) -> Result<PortRole, BridgeError> {
        let raw = RawAdvertisement::decode(data).map_err(|e| {
            warn!("Bridge '{}': Discarding advertisement: {}", name, e);
            BridgeError::Protocol(e)
        })?;
        self.apply(name, raw)
    }

    /// Strip the length prefix from a received frame and apply it to bridge `name`
    pub fn apply_frame(&self, name: &str, frame: &[u8]) -> Result<PortRole, BridgeError> {
        let payload = unframe_advertisement(frame).map_err(|e| {
            warn!("Bridge '{}': Discarding advertisement: {}", name, e);
            BridgeError::Protocol(e)
        })?;
        self.apply_bytes(name, payload)
    }

    /// Advertisement to send to every neighbor
    pub fn outbound_advertisement(&self) -> RawAdvertisement {
        RawAdvertisement::from_status(&self.status.snapshot())
    }

    /// Length-prefixed outbound advertisement, ready for the transport
    pub fn outbound_frame(&self) -> Result<Vec<u8>, BridgeError> {
        Ok(frame_advertisement(&self.outbound_advertisement())?)
    }

    /// Get the number of bridges
    pub fn bridge_count(&self) -> usize {
        self.bridges.len()
    }

    /// Registry snapshots of all bridges, ordered by name
    pub fn status(&self) -> Vec<BridgeSnapshot> {
        let bridges: Vec<_> = self.bridges.iter().map(|b| b.value().clone()).collect();
        let mut snapshots: Vec<_> = bridges.iter().map(|b| b.snapshot()).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}
