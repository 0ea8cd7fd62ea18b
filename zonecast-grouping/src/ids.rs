//! Identity types for the external grouping system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a group on the external audio server
///
/// Group IDs are opaque strings assigned by the external system; they
/// only need to be comparable and orderable (correction planning breaks
/// ties by lowest group ID).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    /// Creates a new GroupId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        GroupId::new(s)
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        GroupId::new(s)
    }
}

/// Identifier of an audio stream on the external audio server
///
/// Each zone drives exactly one stream; the stream is what the zone's
/// group plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(String);

impl StreamId {
    /// Creates a new StreamId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        StreamId::new(s)
    }
}

/// Identifier of a playback client as known to the external audio server
///
/// Distinct from the installation's own 1-based client index: this is
/// the ID the external system reports in grouping snapshots and accepts
/// in move operations (commonly derived from the endpoint's MAC).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalClientId(String);

impl ExternalClientId {
    /// Creates a new ExternalClientId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExternalClientId {
    fn from(s: &str) -> Self {
        ExternalClientId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_ordering() {
        let a = GroupId::new("g-a");
        let b = GroupId::new("g-b");
        assert!(a < b);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", GroupId::new("g1")), "g1");
        assert_eq!(format!("{}", StreamId::new("radio")), "radio");
        assert_eq!(format!("{}", ExternalClientId::new("aa:bb")), "aa:bb");
    }

    #[test]
    fn test_equality() {
        assert_eq!(ExternalClientId::new("c1"), ExternalClientId::from("c1"));
        assert_ne!(GroupId::new("g1"), GroupId::new("g2"));
    }
}
