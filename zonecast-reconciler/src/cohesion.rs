//! Zone-cohesion checking
//!
//! The cohesion rule: every client a zone desires that the external
//! system reports at all must sit in the same actual group. An actual
//! group may additionally hold other zones' clients - merged listening
//! is healthy, not a fault. A zone is *split* only when its desired
//! members are spread over two or more distinct actual groups.
//!
//! Everything in this module is pure and side-effect free, so "is it
//! broken?" can be asked - by operators, monitoring, or tests - without
//! ever triggering a fix.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use zonecast_grouping::{GroupId, GroupingSnapshot};
use zonecast_state::{ClientId, ClientState, ZoneId, ZoneState};

/// One zone found spread across multiple actual groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitZone {
    /// The offending zone
    pub zone: ZoneId,
    /// The actual groups its members were found in, ascending
    pub groups: Vec<GroupId>,
}

/// Result of one cohesion check over a set of zones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohesionReport {
    /// Zones found split, ascending by zone ID
    pub splits: Vec<SplitZone>,
}

impl CohesionReport {
    /// Whether every checked zone is cohesive
    pub fn is_cohesive(&self) -> bool {
        self.splits.is_empty()
    }

    /// IDs of the offending zones
    pub fn split_zone_ids(&self) -> Vec<ZoneId> {
        self.splits.iter().map(|s| s.zone).collect()
    }
}

/// Distinct actual groups hosting at least one desired member of a zone
///
/// Members the snapshot does not report (disconnected endpoints, unknown
/// IDs) contribute no group. The result is sorted and duplicate-free.
pub fn zone_spread(
    zone: &ZoneState,
    clients: &HashMap<ClientId, ClientState>,
    snapshot: &GroupingSnapshot,
) -> Vec<GroupId> {
    let mut groups: Vec<GroupId> = zone
        .members
        .iter()
        .filter_map(|member| clients.get(member))
        .filter_map(|client| snapshot.group_of(&client.external_id))
        .map(|group| group.id.clone())
        .collect();
    groups.sort();
    groups.dedup();
    groups
}

/// Check one zone against a snapshot
pub fn check_zone(
    zone_id: ZoneId,
    zone: &ZoneState,
    clients: &HashMap<ClientId, ClientState>,
    snapshot: &GroupingSnapshot,
) -> Option<SplitZone> {
    let groups = zone_spread(zone, clients, snapshot);
    if groups.len() > 1 {
        Some(SplitZone {
            zone: zone_id,
            groups,
        })
    } else {
        None
    }
}

/// Check every zone against a snapshot
pub fn check(
    zones: &HashMap<ZoneId, ZoneState>,
    clients: &HashMap<ClientId, ClientState>,
    snapshot: &GroupingSnapshot,
) -> CohesionReport {
    let mut ids: Vec<ZoneId> = zones.keys().copied().collect();
    ids.sort();

    let splits = ids
        .into_iter()
        .filter_map(|id| check_zone(id, &zones[&id], clients, snapshot))
        .collect();
    CohesionReport { splits }
}
