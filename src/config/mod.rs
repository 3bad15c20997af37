//! Configuration Module
//!
//! Provides TOML-based configuration with support for:
//! - Logging level
//! - Local broker identity
//! - Bridge links
//! - Environment variable overrides (STPBRIDGE_* prefix)

use std::collections::HashSet;
use std::path::Path;

use config::{Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;

use crate::stp::BrokerIdentity;

pub use bridge::BridgeConfig;
pub use replay::{ReplayEntry, ReplayFile};

mod bridge;
mod replay;

/// Substitute environment variables in a string.
/// Supports `${VAR}` and `${VAR:-default}` syntax.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is valid");
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}


/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file
    Io(std::io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
    /// Config crate error
    Config(config::ConfigError),
    /// Validation error
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Config(e) => write!(f, "Config error: {}", e),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Config(e)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,
    /// Local broker identity
    pub broker: BrokerConfig,
    /// Bridge links
    #[serde(default)]
    pub bridge: Vec<BridgeConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Identity this broker advertises to its neighbors
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Address neighbors reach this broker on
    pub address: String,
    /// Port neighbors reach this broker on
    pub port: u16,
    /// Tie-breaking identifier, unique across the mesh (default: OS process id)
    pub process_id: Option<u64>,
    /// Optional instance tag
    pub instance_id: Option<String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 1883,
            process_id: None,
            instance_id: None,
        }
    }
}

impl BrokerConfig {
    pub fn identity(&self) -> BrokerIdentity {
        let process_id = self
            .process_id
            .unwrap_or_else(|| u64::from(std::process::id()));
        BrokerIdentity {
            address: self.address.clone(),
            port: self.port,
            process_id,
            instance_id: self.instance_id.clone(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with environment variable support.
    ///
    /// Supports:
    /// - `${VAR}` and `${VAR:-default}` substitution in the file
    /// - `STPBRIDGE__SECTION__KEY` overrides (e.g. `STPBRIDGE__BROKER__PORT=1884`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("log.level", "warn")?
            .set_default("broker.address", "127.0.0.1")?
            .set_default("broker.port", 1883)?;

        // Load from file with env var substitution
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let substituted = substitute_env_vars(&content);
                builder = builder.add_source(File::from_str(&substituted, FileFormat::Toml));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File doesn't exist, use defaults
            }
            Err(e) => return Err(ConfigError::Io(e)),
        }

        // Double underscore separates nested keys, single underscore preserved in field names
        let cfg = builder
            .add_source(
                Environment::with_prefix("STPBRIDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = cfg.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides only (no file).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Path::new(""))
    }

    /// Parse configuration from a string (for testing, no env var support)
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.address.is_empty() {
            return Err(ConfigError::Validation(
                "broker.address must not be empty".to_string(),
            ));
        }
        if self.broker.port == 0 {
            return Err(ConfigError::Validation(
                "broker.port must be non-zero".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for bridge in &self.bridge {
            if bridge.name.is_empty() {
                return Err(ConfigError::Validation(
                    "bridge name must not be empty".to_string(),
                ));
            }
            if !names.insert(bridge.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate bridge name '{}'",
                    bridge.name
                )));
            }
        }

        Ok(())
    }
}
