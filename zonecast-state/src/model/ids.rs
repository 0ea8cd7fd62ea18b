//! Zone and client identity types
//!
//! Both are 1-based indices fixed by the installation configuration; the
//! external system's own identifiers live in `zonecast_grouping`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based index of a zone in the installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Creates a new ZoneId
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw 1-based index
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone-{}", self.0)
    }
}

impl From<u32> for ZoneId {
    fn from(index: u32) -> Self {
        ZoneId::new(index)
    }
}

/// 1-based index of a playback client in the installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u32);

impl ClientId {
    /// Creates a new ClientId
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw 1-based index
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

impl From<u32> for ClientId {
    fn from(index: u32) -> Self {
        ClientId::new(index)
    }
}
