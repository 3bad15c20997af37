//! Bridge Link
//!
//! One configured link to a neighboring broker and the port registries
//! classified on it. Advertisements arriving on the same link are applied
//! one at a time.

use std::fmt;

use parking_lot::Mutex;

use crate::config::BridgeConfig;
use crate::stp::{
    apply_advertisement, Advertisement, PortRegistries, PortRole, RegistryKind, SharedStatus,
    StpError,
};

/// Point-in-time copy of a bridge's registries, most recent first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSnapshot {
    pub name: String,
    pub designated: Vec<u16>,
    pub root: Vec<u16>,
    pub blocked: Vec<u16>,
}

impl fmt::Display for BridgeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: designated {:?}, root {:?}, blocked {:?}",
            self.name, self.designated, self.root, self.blocked
        )
    }
}

/// A bridge link and its port role registries
pub struct Bridge {
    name: String,
    address: String,
    port: u16,
    registries: Mutex<PortRegistries>,
}

impl Bridge {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            name: config.name.clone(),
            address: config.address.clone(),
            port: config.port,
            registries: Mutex::new(PortRegistries::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured neighbor address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Configured neighbor port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Apply an advertisement received on this link.
    ///
    /// Takes the bridge lock before the status lock; nothing else in the
    /// crate holds both, so the order cannot invert.
    pub fn apply(
        &self,
        status: &SharedStatus,
        advertisement: &Advertisement,
    ) -> Result<PortRole, StpError> {
        let mut registries = self.registries.lock();
        let mut status = status.lock();
        apply_advertisement(&mut status, &mut registries, advertisement)
    }

    /// Role of `port` on this link.
    ///
    /// A port held by more than one registry reports blocked first, then
    /// root, then designated.
    pub fn role_of(&self, port: u16) -> Option<PortRole> {
        let kinds = self.registries.lock().kinds_of(port);
        [RegistryKind::Blocked, RegistryKind::Root, RegistryKind::Designated]
            .into_iter()
            .find(|kind| kinds.contains(kind))
            .map(PortRole::from)
    }

    /// Whether relayed traffic may use `port`
    pub fn is_forwarding(&self, port: u16) -> bool {
        matches!(
            self.role_of(port),
            Some(PortRole::Designated | PortRole::Root)
        )
    }

    pub fn ports(&self, kind: RegistryKind) -> Vec<u16> {
        self.registries.lock().get(kind).ports()
    }

    pub fn snapshot(&self) -> BridgeSnapshot {
        let registries = self.registries.lock();
        BridgeSnapshot {
            name: self.name.clone(),
            designated: registries.designated.ports(),
            root: registries.root.ports(),
            blocked: registries.blocked.ports(),
        }
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("port", &self.port)
            .finish()
    }
}
