//! Bridge Spanning Tree
//!
//! Loop prevention for meshes of bridged brokers. Every broker starts out
//! believing it is the root. Neighbors exchange advertisements carrying the
//! root they believe in and their distance to it; each received
//! advertisement classifies the link it arrived on as designated, root or
//! blocked until the mesh agrees on the broker with the lowest process id.
//!
//! Only designated and root links should carry relayed traffic. The relay
//! layer reads the registries; this module never touches the network.

mod advertisement;
mod convergence;
mod error;
mod identity;
mod registry;
mod role;


pub use advertisement::{
    frame_advertisement, unframe_advertisement, Advertisement, RawAdvertisement, FRAME_HEADER_LEN,
};
pub use convergence::apply_advertisement;
pub use error::{Result, StpError};
pub use identity::{BrokerIdentity, ProtocolStatus, RootIdentity, SharedStatus};
pub use registry::{PortRecord, PortRegistries, PortRegistry, RegistryKind};
pub use role::{decide_role, PortRole};
