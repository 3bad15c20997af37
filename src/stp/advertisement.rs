//! Bridge Advertisements
//!
//! A neighbor's claim about the root it believes in and its distance to it
//! (the equivalent of a BPDU). Advertisements travel as string-encoded
//! fields in [`RawAdvertisement`] and are parsed exactly once into the typed
//! [`Advertisement`] before any protocol logic sees them.

use std::str::FromStr;

use bincode::{Decode, Encode};
use serde::Deserialize;

use super::error::{Result, StpError};
use super::identity::ProtocolStatus;

/// Advertisement as carried on the wire
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Deserialize)]
pub struct RawAdvertisement {
    #[serde(default)]
    pub origin_address: Option<String>,
    pub origin_port: String,
    pub origin_process_id: String,
    #[serde(default)]
    pub origin_instance_id: Option<String>,
    pub claimed_root_port: String,
    pub claimed_root_process_id: String,
    pub distance: String,
}

impl RawAdvertisement {
    /// Build the advertisement this broker sends to its neighbors
    pub fn from_status(status: &ProtocolStatus) -> Self {
        Self {
            origin_address: Some(status.local.address.clone()),
            origin_port: status.local.port.to_string(),
            origin_process_id: status.local.process_id.to_string(),
            origin_instance_id: status.local.instance_id.clone(),
            claimed_root_port: status.believed_root.port.to_string(),
            claimed_root_process_id: status.believed_root.process_id.to_string(),
            distance: status.distance.to_string(),
        }
    }

    /// Encode to bytes using bincode
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, bincode::config::standard())?)
    }

    /// Decode from bytes using bincode
    /// Decode from bytes using bincode; the buffer must hold exactly one
    /// advertisement
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (raw, consumed) = bincode::decode_from_slice(data, bincode::config::standard())?;
        if consumed != data.len() {
            return Err(StpError::Decode(format!(
                "{} trailing bytes after advertisement",
                data.len() - consumed
            )));
        }
        Ok(raw)
    }
}

/// Length of the big-endian prefix on a framed advertisement
pub const FRAME_HEADER_LEN: usize = 4;

/// Prefix an encoded advertisement with its big-endian length
pub fn frame_advertisement(raw: &RawAdvertisement) -> Result<Vec<u8>> {
    let payload = raw.encode()?;
    let len = u32::try_from(payload.len())
        .map_err(|_| StpError::Encode("advertisement exceeds frame size".to_string()))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Strip the length prefix from one complete frame.
///
/// The prefix must match the payload that follows it exactly.
pub fn unframe_advertisement(frame: &[u8]) -> Result<&[u8]> {
    let (header, payload) = frame
        .split_first_chunk::<FRAME_HEADER_LEN>()
        .ok_or_else(|| StpError::Decode("frame shorter than length prefix".to_string()))?;
    let declared = u32::from_be_bytes(*header) as usize;
    if declared != payload.len() {
        return Err(StpError::Decode(format!(
            "frame declares {} bytes, carries {}",
            declared,
            payload.len()
        )));
    }
    Ok(payload)
}

/// Validated advertisement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    pub origin_address: Option<String>,
    pub origin_port: u16,
    pub origin_process_id: u64,
    pub origin_instance_id: Option<String>,
    pub claimed_root_port: u16,
    pub claimed_root_process_id: u64,
    /// Sender's hop count to the claimed root; always below `u32::MAX`
    pub distance: u32,
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| StpError::MalformedAdvertisement {
            field,
            value: value.to_string(),
        })
}

impl TryFrom<RawAdvertisement> for Advertisement {
    type Error = StpError;

    fn try_from(raw: RawAdvertisement) -> Result<Self> {
        let distance: u32 = parse_field("distance", &raw.distance)?;
        // We store distance + 1 when adopting this path
        if distance == u32::MAX {
            return Err(StpError::MalformedAdvertisement {
                field: "distance",
                value: raw.distance,
            });
        }

        Ok(Self {
            origin_port: parse_field("origin_port", &raw.origin_port)?,
            origin_process_id: parse_field("origin_process_id", &raw.origin_process_id)?,
            claimed_root_port: parse_field("claimed_root_port", &raw.claimed_root_port)?,
            claimed_root_process_id: parse_field(
                "claimed_root_process_id",
                &raw.claimed_root_process_id,
            )?,
            distance,
            origin_address: raw.origin_address,
            origin_instance_id: raw.origin_instance_id,
        })
    }
}
