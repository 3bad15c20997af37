//! Replay Files
//!
//! A TOML list of advertisements, each tagged with the bridge it arrives on.
//! Fields keep their wire encoding so malformed values reach the parser.
//!
//! ```toml
//! [[advertisement]]
//! bridge = "edge-b"
//! origin_address = "10.0.0.2"
//! origin_port = "1884"
//! origin_process_id = "77"
//! claimed_root_port = "1883"
//! claimed_root_process_id = "5"
//! distance = "1"
//! ```

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;
use crate::stp::RawAdvertisement;

/// One advertisement and the bridge it is delivered to
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayEntry {
    pub bridge: String,
    #[serde(flatten)]
    pub advertisement: RawAdvertisement,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayFile {
    #[serde(default)]
    pub advertisement: Vec<ReplayEntry>,
}

impl ReplayFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Entries grouped per bridge, preserving arrival order within a bridge
    pub fn by_bridge(self) -> Vec<(String, Vec<RawAdvertisement>)> {
        let mut groups: Vec<(String, Vec<RawAdvertisement>)> = Vec::new();
        for entry in self.advertisement {
            match groups.iter_mut().find(|(name, _)| *name == entry.bridge) {
                Some((_, list)) => list.push(entry.advertisement),
                None => groups.push((entry.bridge, vec![entry.advertisement])),
            }
        }
        groups
    }
}
