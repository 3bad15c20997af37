//! Bridge Module Tests

use crate::config::BridgeConfig;
use crate::stp::{
    frame_advertisement, unframe_advertisement, BrokerIdentity, PortRole, RawAdvertisement,
    RegistryKind, SharedStatus, StpError,
};

use super::{BridgeError, BridgeManager};

fn bridge_config(name: &str, port: u16) -> BridgeConfig {
    BridgeConfig {
        name: name.to_string(),
        address: "10.0.0.2".to_string(),
        port,
        enabled: true,
    }
}

fn manager() -> BridgeManager {
    let status = SharedStatus::new(BrokerIdentity::new("10.0.0.1", 1883, 100));
    BridgeManager::from_configs(
        status,
        &[bridge_config("edge-b", 1884), bridge_config("edge-c", 1885)],
    )
}

fn raw(origin_port: u16, origin_pid: u64, root_pid: u64, distance: u32) -> RawAdvertisement {
    RawAdvertisement {
        origin_address: Some("10.0.0.2".to_string()),
        origin_port: origin_port.to_string(),
        origin_process_id: origin_pid.to_string(),
        origin_instance_id: None,
        claimed_root_port: "1900".to_string(),
        claimed_root_process_id: root_pid.to_string(),
        distance: distance.to_string(),
    }
}

// =============================================================================
// Manager Tests
// =============================================================================

#[test]
fn test_from_configs_skips_disabled() {
    let status = SharedStatus::new(BrokerIdentity::new("10.0.0.1", 1883, 100));
    let disabled = BridgeConfig {
        enabled: false,
        ..bridge_config("off", 1886)
    };
    let manager = BridgeManager::from_configs(status, &[bridge_config("on", 1884), disabled]);

    assert_eq!(manager.bridge_count(), 1);
    assert!(manager.get("on").is_some());
    assert!(manager.get("off").is_none());
}

#[test]
fn test_apply_unknown_bridge() {
    let manager = manager();
    assert_eq!(
        manager.apply("nope", raw(1884, 50, 5, 0)),
        Err(BridgeError::UnknownBridge("nope".to_string()))
    );
}

#[test]
fn test_apply_root_updates_shared_status() {
    let manager = manager();

    let role = manager.apply("edge-b", raw(1884, 50, 5, 0)).unwrap();

    assert_eq!(role, PortRole::Root);
    let status = manager.protocol_status().snapshot();
    assert_eq!(status.distance, 1);
    assert_eq!(status.believed_root.process_id, 5);
    assert_eq!(manager.get("edge-b").unwrap().ports(RegistryKind::Root), vec![1884]);
}

#[test]
fn test_root_change_is_seen_by_other_bridges() {
    let manager = manager();

    manager.apply("edge-b", raw(1884, 50, 5, 0)).unwrap();
    // edge-c claims a worse root; we now know a better one
    let role = manager.apply("edge-c", raw(1885, 60, 7, 0)).unwrap();

    assert_eq!(role, PortRole::Designated);
    assert_eq!(
        manager.get("edge-c").unwrap().ports(RegistryKind::Designated),
        vec![1885]
    );
}

#[test]
fn test_apply_malformed_is_discarded() {
    let manager = manager();
    let mut bad = raw(1884, 50, 5, 0);
    bad.distance = "two".to_string();

    let err = manager.apply("edge-b", bad).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Protocol(StpError::MalformedAdvertisement {
            field: "distance",
            ..
        })
    ));
    assert!(manager.protocol_status().snapshot().is_root());
}

#[test]
fn test_self_loop_leaves_bridge_usable() {
    let manager = manager();
    let mut echo = raw(1883, 50, 5, 0);
    echo.origin_address = Some("10.0.0.1".to_string());

    assert_eq!(
        manager.apply("edge-b", echo),
        Err(BridgeError::Protocol(StpError::SelfLoop))
    );
    let snapshot = manager.get("edge-b").unwrap().snapshot();
    assert!(snapshot.designated.is_empty());
    assert!(snapshot.root.is_empty());
    assert!(snapshot.blocked.is_empty());

    assert!(manager.apply("edge-b", raw(1884, 50, 5, 0)).is_ok());
}

#[test]
fn test_apply_bytes() {
    let manager = manager();
    let bytes = raw(1884, 50, 5, 0).encode().unwrap();

    assert_eq!(manager.apply_bytes("edge-b", &bytes), Ok(PortRole::Root));
    assert!(matches!(
        manager.apply_bytes("edge-b", &[0xff]),
        Err(BridgeError::Protocol(StpError::Decode(_)))
    ));
}

#[test]
fn test_apply_bytes_rejects_trailing_bytes() {
    let manager = manager();
    let mut bytes = raw(1884, 50, 5, 0).encode().unwrap();
    bytes.extend_from_slice(b"garbage");

    assert!(matches!(
        manager.apply_bytes("edge-b", &bytes),
        Err(BridgeError::Protocol(StpError::Decode(_)))
    ));
    assert!(manager.protocol_status().snapshot().is_root());
    assert!(manager.get("edge-b").unwrap().snapshot().root.is_empty());
}

#[test]
fn test_apply_frame() {
    let manager = manager();
    let frame = frame_advertisement(&raw(1884, 50, 5, 0)).unwrap();

    assert_eq!(manager.apply_frame("edge-b", &frame), Ok(PortRole::Root));
    assert_eq!(manager.protocol_status().distance(), 1);
}

#[test]
fn test_apply_frame_rejects_length_mismatch() {
    let manager = manager();
    let mut frame = frame_advertisement(&raw(1884, 50, 5, 0)).unwrap();
    frame.extend_from_slice(b"xx");

    assert!(matches!(
        manager.apply_frame("edge-b", &frame),
        Err(BridgeError::Protocol(StpError::Decode(_)))
    ));
    assert!(manager.protocol_status().snapshot().is_root());
}

#[test]
fn test_outbound_frame() {
    let manager = manager();
    let frame = manager.outbound_frame().unwrap();
    let payload = unframe_advertisement(&frame).unwrap();
    assert_eq!(
        RawAdvertisement::decode(payload).unwrap(),
        manager.outbound_advertisement()
    );
}

#[test]
fn test_outbound_advertisement_reflects_status() {
    let manager = manager();
    manager.apply("edge-b", raw(1884, 50, 5, 2)).unwrap();

    let out = manager.outbound_advertisement();
    assert_eq!(out.origin_port, "1883");
    assert_eq!(out.origin_process_id, "100");
    assert_eq!(out.claimed_root_process_id, "5");
    assert_eq!(out.distance, "3");
}

#[test]
fn test_remove_bridge() {
    let manager = manager();
    assert!(manager.remove_bridge("edge-b").is_some());
    assert!(manager.remove_bridge("edge-b").is_none());
    assert_eq!(manager.bridge_count(), 1);
    assert!(matches!(
        manager.apply("edge-b", raw(1884, 50, 5, 0)),
        Err(BridgeError::UnknownBridge(_))
    ));
}

#[test]
fn test_status_sorted_by_name() {
    let manager = manager();
    let names: Vec<_> = manager.status().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["edge-b", "edge-c"]);
}

// =============================================================================
// Bridge Tests
// =============================================================================

#[test]
fn test_role_of_and_forwarding() {
    let manager = manager();
    let bridge = manager.get("edge-b").unwrap();

    // Root on 1884, then a better root on 1886 demotes 1884
    manager.apply("edge-b", raw(1884, 50, 10, 0)).unwrap();
    manager.apply("edge-b", raw(1886, 60, 5, 0)).unwrap();
    // Worse root from 1887
    manager.apply("edge-b", raw(1887, 70, 20, 0)).unwrap();

    assert_eq!(bridge.role_of(1886), Some(PortRole::Root));
    assert_eq!(bridge.role_of(1884), Some(PortRole::Blocked));
    assert_eq!(bridge.role_of(1887), Some(PortRole::Designated));
    assert_eq!(bridge.role_of(1999), None);

    assert!(bridge.is_forwarding(1886));
    assert!(bridge.is_forwarding(1887));
    assert!(!bridge.is_forwarding(1884));
    assert!(!bridge.is_forwarding(1999));
}

#[test]
fn test_snapshot_display() {
    let manager = manager();
    manager.apply("edge-b", raw(1884, 50, 5, 0)).unwrap();

    let snapshot = manager.get("edge-b").unwrap().snapshot();
    assert_eq!(
        snapshot.to_string(),
        "edge-b: designated [], root [1884], blocked []"
    );
}

#[test]
fn test_role_of_prefers_blocked() {
    let manager = manager();
    let bridge = manager.get("edge-b").unwrap();

    // Root, then blocked for the same port at the same root and distance
    manager.apply("edge-b", raw(1884, 50, 5, 1)).unwrap();
    manager.apply("edge-b", raw(1884, 50, 5, 2)).unwrap();

    let snapshot = bridge.snapshot();
    assert_eq!(snapshot.root, vec![1884]);
    assert_eq!(snapshot.blocked, vec![1884]);
    assert_eq!(bridge.role_of(1884), Some(PortRole::Blocked));
    assert!(!bridge.is_forwarding(1884));
}
