//! Broker identity and protocol status
//!
//! One [`ProtocolStatus`] exists per broker process. It is shared by every
//! bridge link through [`SharedStatus`], which serializes all reads and
//! read-modify-write cycles of the believed root and distance.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// Identity of a running broker instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerIdentity {
    pub address: String,
    pub port: u16,
    /// Tie-breaking instance identifier; lower wins
    pub process_id: u64,
    /// Opaque instance tag carried alongside `process_id`
    pub instance_id: Option<String>,
}

impl BrokerIdentity {
    pub fn new(address: impl Into<String>, port: u16, process_id: u64) -> Self {
        Self {
            address: address.into(),
            port,
            process_id,
            instance_id: None,
        }
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }
}

/// The root broker as currently believed by the local broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootIdentity {
    pub port: u16,
    pub process_id: u64,
    pub instance_id: Option<String>,
    pub address: Option<String>,
}

impl From<&BrokerIdentity> for RootIdentity {
    fn from(identity: &BrokerIdentity) -> Self {
        Self {
            port: identity.port,
            process_id: identity.process_id,
            instance_id: identity.instance_id.clone(),
            address: Some(identity.address.clone()),
        }
    }
}

/// Per-broker spanning-tree state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolStatus {
    /// This broker
    pub local: BrokerIdentity,
    pub believed_root: RootIdentity,
    /// Hop count to `believed_root`; zero only while we are the root
    pub distance: u32,
}

impl ProtocolStatus {
    /// Fresh status: every broker starts out believing it is the root.
    pub fn new(local: BrokerIdentity) -> Self {
        let believed_root = RootIdentity::from(&local);
        Self {
            local,
            believed_root,
            distance: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.distance == 0
    }
}

/// Process-wide handle to the protocol status
#[derive(Debug, Clone)]
pub struct SharedStatus {
    inner: Arc<Mutex<ProtocolStatus>>,
}

impl SharedStatus {
    pub fn new(local: BrokerIdentity) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ProtocolStatus::new(local))),
        }
    }

    /// Exclusive access for a decide-then-update cycle
    pub(crate) fn lock(&self) -> MutexGuard<'_, ProtocolStatus> {
        self.inner.lock()
    }

    /// Consistent copy of the whole status
    pub fn snapshot(&self) -> ProtocolStatus {
        self.inner.lock().clone()
    }

    pub fn distance(&self) -> u32 {
        self.inner.lock().distance
    }

    pub fn believed_root(&self) -> RootIdentity {
        self.inner.lock().believed_root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_status_is_root() {
        let local = BrokerIdentity::new("10.0.0.1", 1883, 42).with_instance_id("edge-a");
        let status = ProtocolStatus::new(local);

        assert!(status.is_root());
        assert_eq!(status.believed_root.process_id, 42);
        assert_eq!(status.believed_root.port, 1883);
        assert_eq!(status.believed_root.address.as_deref(), Some("10.0.0.1"));
        assert_eq!(status.believed_root.instance_id.as_deref(), Some("edge-a"));
    }

    #[test]
    fn test_shared_status_clones_share_state() {
        let status = SharedStatus::new(BrokerIdentity::new("10.0.0.1", 1883, 42));
        let other = status.clone();

        status.lock().distance = 3;
        assert_eq!(other.distance(), 3);
        assert!(!other.snapshot().is_root());
    }
}
