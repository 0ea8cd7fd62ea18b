//! Observed grouping snapshot types
//!
//! A `GroupingSnapshot` is the external audio server's real-time view of
//! which clients sit in which groups. It is fetched fresh for every
//! validation or correction pass and discarded afterwards; nothing in it
//! is ever persisted or treated as desired state.

use serde::{Deserialize, Serialize};

use crate::ids::{ExternalClientId, GroupId, StreamId};

/// One group as reported by the external audio server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// Group identifier
    pub id: GroupId,
    /// Stream the group is currently playing, if reported
    pub stream_id: Option<StreamId>,
    /// Clients currently in this group
    pub members: Vec<ExternalClientId>,
}

impl GroupSnapshot {
    /// Create a group snapshot without stream information
    pub fn new(id: GroupId, members: Vec<ExternalClientId>) -> Self {
        Self {
            id,
            stream_id: None,
            members,
        }
    }

    /// Check whether a client is in this group
    pub fn contains(&self, client: &ExternalClientId) -> bool {
        self.members.iter().any(|m| m == client)
    }

    /// Number of clients in this group
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// The external system's full grouping state at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSnapshot {
    /// All groups reported by the external system
    pub groups: Vec<GroupSnapshot>,
}

impl GroupingSnapshot {
    /// Create a snapshot from a list of groups
    pub fn new(groups: Vec<GroupSnapshot>) -> Self {
        Self { groups }
    }

    /// Find the group currently holding a client
    ///
    /// Returns `None` for clients the external system does not report
    /// (e.g. disconnected endpoints).
    pub fn group_of(&self, client: &ExternalClientId) -> Option<&GroupSnapshot> {
        self.groups.iter().find(|g| g.contains(client))
    }

    /// Look up a group by ID
    pub fn group(&self, id: &GroupId) -> Option<&GroupSnapshot> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// Number of groups in the snapshot
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of clients across all groups
    pub fn client_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// Check whether the snapshot reports no groups at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
