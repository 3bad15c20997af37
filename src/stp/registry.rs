//! Port Registries
//!
//! Ordered collections of classified bridge ports. The most recently added
//! record sits at the head; membership is decided by port number alone, so
//! two records naming the same port on different addresses are one entry.

use std::collections::VecDeque;
use std::fmt;

use super::error::{Result, StpError};

/// Which role a registry tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    Designated,
    Root,
    Blocked,
}

impl RegistryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Designated => "designated",
            RegistryKind::Root => "root",
            RegistryKind::Blocked => "blocked",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified link endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    /// Peer address, when the advertisement carried one
    pub address: Option<String>,
    pub port: u16,
}

impl PortRecord {
    pub fn new(address: Option<String>, port: u16) -> Self {
        Self { address, port }
    }
}

/// Most-recent-first list of port records with no duplicate ports
#[derive(Debug, Clone)]
pub struct PortRegistry {
    kind: RegistryKind,
    records: VecDeque<PortRecord>,
}

impl PortRegistry {
    pub fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            records: VecDeque::new(),
        }
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Prepend `record` unless its port is already present.
    ///
    /// Returns `true` if the registry changed.
    pub fn add(&mut self, record: PortRecord) -> bool {
        if self.contains(record.port) {
            return false;
        }
        self.records.push_front(record);
        true
    }

    pub fn contains(&self, port: u16) -> bool {
        self.records.iter().any(|r| r.port == port)
    }

    /// Remove and return the most recently added record.
    pub fn remove_head(&mut self) -> Result<PortRecord> {
        self.records
            .pop_front()
            .ok_or(StpError::EmptyRegistry(self.kind))
    }

    /// Most recently added record
    pub fn head(&self) -> Option<&PortRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortRecord> {
        self.records.iter()
    }

    /// Port numbers, most recent first
    pub fn ports(&self) -> Vec<u16> {
        self.records.iter().map(|r| r.port).collect()
    }
}

impl fmt::Display for PortRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.kind)?;
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", record.port)?;
        }
        f.write_str("]")
    }
}

/// The three role registries kept for one bridge link
#[derive(Debug, Clone)]
pub struct PortRegistries {
    pub designated: PortRegistry,
    pub root: PortRegistry,
    pub blocked: PortRegistry,
}

impl PortRegistries {
    pub fn new() -> Self {
        Self {
            designated: PortRegistry::new(RegistryKind::Designated),
            root: PortRegistry::new(RegistryKind::Root),
            blocked: PortRegistry::new(RegistryKind::Blocked),
        }
    }

    pub fn get(&self, kind: RegistryKind) -> &PortRegistry {
        match kind {
            RegistryKind::Designated => &self.designated,
            RegistryKind::Root => &self.root,
            RegistryKind::Blocked => &self.blocked,
        }
    }

    /// Registries that currently hold `port`
    pub fn kinds_of(&self, port: u16) -> Vec<RegistryKind> {
        [RegistryKind::Root, RegistryKind::Designated, RegistryKind::Blocked]
            .into_iter()
            .filter(|kind| self.get(*kind).contains(port))
            .collect()
    }
}

impl Default for PortRegistries {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PortRegistries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.designated, self.root, self.blocked)
    }
}
