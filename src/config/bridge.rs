//! Bridge Configuration
//!
//! Configuration for the bridge links of the local broker.

use serde::Deserialize;

/// Configuration for a single bridge link
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Unique name for this bridge
    pub name: String,

    /// Neighbor broker address
    pub address: String,

    /// Neighbor broker port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether this bridge is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_port() -> u16 {
    1883
}

fn default_true() -> bool {
    true
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            address: "localhost".to_string(),
            port: default_port(),
            enabled: true,
        }
    }
}

impl BridgeConfig {
    /// Neighbor endpoint as `address:port`
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.port, 1883);
        assert!(config.enabled);
        assert_eq!(config.endpoint(), "localhost:1883");
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: BridgeConfig = toml::from_str(
            r#"
name = "edge"
address = "10.0.0.2"
"#,
        )
        .unwrap();
        assert_eq!(config.port, 1883);
        assert!(config.enabled);
    }
}
