//! Zone state type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zonecast_grouping::{GroupId, StreamId};

use super::{ClientId, PlaylistRef, TrackRef};

/// Desired and observed state of one listening area
///
/// `members` is the authoritative DESIRED membership; the external
/// system's actual grouping is reconciled towards it. `group_id` is the
/// zone's current binding to an actual group and is updated by
/// reconciliation when the zone converges onto a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneState {
    /// Display name of the zone
    pub name: String,
    /// Icon hint for user interfaces
    pub icon: String,
    /// Whether the zone is currently playing
    pub playing: bool,
    /// Zone volume, 0..=100
    pub volume: u8,
    /// Whether the zone is muted
    pub muted: bool,
    /// Repeat the current track
    pub track_repeat: bool,
    /// Repeat the current playlist
    pub playlist_repeat: bool,
    /// Shuffle the current playlist
    pub playlist_shuffle: bool,
    /// Actual group this zone is bound to on the external system
    pub group_id: GroupId,
    /// Stream this zone drives on the external system
    pub stream_id: StreamId,
    /// Desired member clients, in order, duplicate-free
    pub members: Vec<ClientId>,
    /// Currently selected playlist, if any
    pub current_playlist: Option<PlaylistRef>,
    /// Currently selected track, if any
    pub current_track: Option<TrackRef>,
    /// When any field of this zone last changed
    pub updated_at: DateTime<Utc>,
}

impl ZoneState {
    /// Create a zone with idle playback defaults
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        stream_id: StreamId,
        members: Vec<ClientId>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            playing: false,
            volume: 0,
            muted: false,
            track_repeat: false,
            playlist_repeat: false,
            playlist_shuffle: false,
            group_id: GroupId::new(""),
            stream_id,
            members,
            current_playlist: None,
            current_track: None,
            updated_at: Utc::now(),
        }
    }

    /// Check whether a client is a desired member of this zone
    pub fn contains_client(&self, client: &ClientId) -> bool {
        self.members.contains(client)
    }

    /// Number of desired members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether this zone has been bound to an actual group yet
    pub fn has_group_binding(&self) -> bool {
        !self.group_id.as_str().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> ZoneState {
        ZoneState::new(
            "Living Room",
            "mdi:sofa",
            StreamId::new("default"),
            vec![ClientId::new(1), ClientId::new(2)],
        )
    }

    #[test]
    fn test_new_defaults() {
        let z = zone();
        assert!(!z.playing);
        assert_eq!(z.volume, 0);
        assert!(!z.muted);
        assert!(z.current_track.is_none());
        assert!(!z.has_group_binding());
    }

    #[test]
    fn test_contains_client() {
        let z = zone();
        assert!(z.contains_client(&ClientId::new(1)));
        assert!(!z.contains_client(&ClientId::new(3)));
        assert_eq!(z.member_count(), 2);
    }
}
