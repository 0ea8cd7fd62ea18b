//! In-memory grouping adapter for tests
//!
//! `FakeGrouping` mimics the external audio server's membership
//! semantics: a client lives in exactly one group, moving it removes it
//! from its previous group, and a group drained of all clients stays in
//! the snapshot as an empty group. Failures can be queued to exercise
//! transient-fault handling.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::adapter::GroupingAdapter;
use crate::error::{GroupingError, Result};
use crate::ids::{ExternalClientId, GroupId};
use crate::snapshot::{GroupSnapshot, GroupingSnapshot};

/// One recorded move operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMove {
    /// The client that was moved
    pub client: ExternalClientId,
    /// The group it was moved into
    pub group: GroupId,
}

#[derive(Default)]
struct Inner {
    groups: Vec<GroupSnapshot>,
    moves: Vec<RecordedMove>,
    queued_failures: VecDeque<GroupingError>,
}

/// In-memory stand-in for the external audio server
#[derive(Default)]
pub struct FakeGrouping {
    inner: Mutex<Inner>,
}

impl FakeGrouping {
    /// Create an empty fake with no groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire grouping state
    ///
    /// Used to seed a scenario or to simulate an external change racing
    /// a correction.
    pub fn set_groups(&self, groups: Vec<(GroupId, Vec<ExternalClientId>)>) {
        let mut inner = self.inner.lock().unwrap();
        inner.groups = groups
            .into_iter()
            .map(|(id, members)| GroupSnapshot::new(id, members))
            .collect();
    }

    /// Queue a failure; the next adapter call returns it instead of
    /// performing the operation
    pub fn fail_next(&self, error: GroupingError) {
        self.inner.lock().unwrap().queued_failures.push_back(error);
    }

    /// All move operations issued so far, in order
    pub fn moves(&self) -> Vec<RecordedMove> {
        self.inner.lock().unwrap().moves.clone()
    }

    /// Number of move operations issued so far
    pub fn move_count(&self) -> usize {
        self.inner.lock().unwrap().moves.len()
    }

    /// Current grouping state (same data `snapshot()` would return)
    pub fn current(&self) -> GroupingSnapshot {
        GroupingSnapshot::new(self.inner.lock().unwrap().groups.clone())
    }

    fn take_failure(inner: &mut Inner) -> Option<GroupingError> {
        inner.queued_failures.pop_front()
    }
}

#[async_trait]
impl GroupingAdapter for FakeGrouping {
    async fn snapshot(&self) -> Result<GroupingSnapshot> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = Self::take_failure(&mut inner) {
            return Err(err);
        }
        Ok(GroupingSnapshot::new(inner.groups.clone()))
    }

    async fn move_client(&self, client: &ExternalClientId, group: &GroupId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = Self::take_failure(&mut inner) {
            return Err(err);
        }

        let known = inner
            .groups
            .iter()
            .any(|g| g.contains(client));
        if !known {
            return Err(GroupingError::UnknownClient(client.clone()));
        }

        // Detach from the current group; an emptied group remains in the
        // snapshot as a zero-member group.
        for g in &mut inner.groups {
            g.members.retain(|m| m != client);
        }

        match inner.groups.iter_mut().find(|g| &g.id == group) {
            Some(g) => g.members.push(client.clone()),
            // Target groups are created implicitly, matching servers that
            // materialize groups on assignment.
            None => inner
                .groups
                .push(GroupSnapshot::new(group.clone(), vec![client.clone()])),
        }

        inner.moves.push(RecordedMove {
            client: client.clone(),
            group: group.clone(),
        });
        Ok(())
    }
}
