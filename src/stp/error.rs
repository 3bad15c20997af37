//! Spanning-tree protocol error types

use std::fmt;

use super::registry::RegistryKind;

/// Errors raised while processing an inbound advertisement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StpError {
    /// Advertisement originated from this broker (address and port match)
    SelfLoop,
    /// Another broker advertises our process identifier
    DuplicateIdentity,
    /// No role could be established for the advertised port
    NoPort,
    /// Head removal attempted on an empty registry
    EmptyRegistry(RegistryKind),
    /// A numeric wire field failed to parse
    MalformedAdvertisement {
        field: &'static str,
        value: String,
    },
    /// Binary advertisement could not be decoded
    Decode(String),
    /// Binary advertisement could not be encoded
    Encode(String),
}

impl StpError {
    /// Errors caused by a misconfigured mesh rather than an internal fault.
    ///
    /// These are logged at warning level and the advertisement is dropped.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::SelfLoop
                | Self::DuplicateIdentity
                | Self::MalformedAdvertisement { .. }
                | Self::Decode(_)
        )
    }
}

impl fmt::Display for StpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => write!(f, "received own advertisement (self loop)"),
            Self::DuplicateIdentity => write!(f, "duplicate broker process identifier"),
            Self::NoPort => write!(f, "no port role could be established"),
            Self::EmptyRegistry(kind) => write!(f, "{} registry is empty", kind),
            Self::MalformedAdvertisement { field, value } => {
                write!(f, "malformed advertisement field {}: {:?}", field, value)
            }
            Self::Decode(e) => write!(f, "advertisement decode error: {}", e),
            Self::Encode(e) => write!(f, "advertisement encode error: {}", e),
        }
    }
}

impl std::error::Error for StpError {}

impl From<bincode::error::DecodeError> for StpError {
    fn from(err: bincode::error::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for StpError {
    fn from(err: bincode::error::EncodeError) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, StpError>;
