//! Port role decision
//!
//! Lower numeric values take precedence: a lower root process id is a
//! better root, a lower distance is a better path, and a lower sender
//! process id wins ties.

use std::cmp::Ordering;
use std::fmt;

use super::advertisement::Advertisement;
use super::identity::ProtocolStatus;
use super::registry::RegistryKind;

/// Role verdict for the port an advertisement arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRole {
    /// We are authoritative on this link
    Designated,
    /// This link is our path toward the root
    Root,
    /// Suppressed to break a loop
    Blocked,
    /// No role could be derived
    NoPort,
}

impl PortRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortRole::Designated => "DESIGNATED",
            PortRole::Root => "ROOT",
            PortRole::Blocked => "BLOCKED",
            PortRole::NoPort => "NO PORT",
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RegistryKind> for PortRole {
    fn from(kind: RegistryKind) -> Self {
        match kind {
            RegistryKind::Designated => PortRole::Designated,
            RegistryKind::Root => PortRole::Root,
            RegistryKind::Blocked => PortRole::Blocked,
        }
    }
}

fn tie_break(my_pid: u64, msg_pid: u64) -> PortRole {
    match my_pid.cmp(&msg_pid) {
        Ordering::Less => PortRole::Designated,
        Ordering::Greater => PortRole::Blocked,
        Ordering::Equal => PortRole::NoPort,
    }
}

/// Classify the link `advertisement` arrived on.
///
/// Pure: depends only on the root process id and distance we hold, our own
/// process id, and the corresponding advertised values.
pub fn decide_role(status: &ProtocolStatus, advertisement: &Advertisement) -> PortRole {
    let my_root_pid = status.believed_root.process_id;
    let my_distance = status.distance;
    let my_pid = status.local.process_id;

    match my_root_pid.cmp(&advertisement.claimed_root_process_id) {
        Ordering::Less => PortRole::Designated,
        Ordering::Greater => PortRole::Root,
        Ordering::Equal => match my_distance.cmp(&advertisement.distance) {
            // Same root, the peer is closer to it
            Ordering::Greater => PortRole::Root,
            Ordering::Less | Ordering::Equal => {
                tie_break(my_pid, advertisement.origin_process_id)
            }
        },
    }
}
