//! Convergence update
//!
//! Applies one validated advertisement to the local protocol status and the
//! registries of the bridge it arrived on. Callers hold the bridge lock and
//! the status lock for the whole call so a root change is observed as one
//! step by every other link.

use tracing::{debug, info, trace};

use super::advertisement::Advertisement;
use super::error::{Result, StpError};
use super::identity::ProtocolStatus;
use super::registry::{PortRecord, PortRegistries};
use super::role::{decide_role, PortRole};

/// Reject advertisements that loop back to us or clone our identity
fn validate(status: &ProtocolStatus, advertisement: &Advertisement) -> Result<()> {
    if advertisement.origin_address.as_deref() == Some(status.local.address.as_str())
        && advertisement.origin_port == status.local.port
    {
        return Err(StpError::SelfLoop);
    }
    if advertisement.origin_process_id == status.local.process_id {
        return Err(StpError::DuplicateIdentity);
    }
    Ok(())
}

/// Adopt the advertised root and move the port into the root registry.
fn elect_root(
    status: &mut ProtocolStatus,
    registries: &mut PortRegistries,
    advertisement: &Advertisement,
    record: PortRecord,
) -> Result<()> {
    let root = &mut status.believed_root;
    root.port = advertisement.claimed_root_port;
    root.process_id = advertisement.claimed_root_process_id;
    if let Some(instance_id) = &advertisement.origin_instance_id {
        root.instance_id = Some(instance_id.clone());
    }
    if let Some(address) = &advertisement.origin_address {
        root.address = Some(address.clone());
    }
    // Parsing guarantees distance < u32::MAX
    status.distance = advertisement.distance + 1;

    if registries.root.contains(record.port) {
        return Ok(());
    }

    // Only one root port at a time; the previous one is demoted
    if !registries.root.is_empty() {
        let previous = registries.root.remove_head()?;
        debug!("Port {} demoted from ROOT to BLOCKED", previous.port);
        registries.blocked.add(previous);
    }
    registries.root.add(record);
    Ok(())
}

/// Validate `advertisement`, classify its port and record the result.
///
/// Returns the role the port was classified as.
pub fn apply_advertisement(
    status: &mut ProtocolStatus,
    registries: &mut PortRegistries,
    advertisement: &Advertisement,
) -> Result<PortRole> {
    trace!(
        "RECV root({}, {}) distance {} origin({}, {})",
        advertisement.claimed_root_port,
        advertisement.claimed_root_process_id,
        advertisement.distance,
        advertisement.origin_port,
        advertisement.origin_process_id
    );

    validate(status, advertisement)?;

    let role = decide_role(status, advertisement);
    let record = PortRecord::new(
        advertisement.origin_address.clone(),
        advertisement.origin_port,
    );

    match role {
        PortRole::Designated => {
            registries.designated.add(record);
        }
        PortRole::Root => elect_root(status, registries, advertisement, record)?,
        PortRole::Blocked => {
            registries.blocked.add(record);
        }
        PortRole::NoPort => return Err(StpError::NoPort),
    }

    info!("Port {} is {}", advertisement.origin_port, role);
    debug!("{}", registries);
    Ok(role)
}
