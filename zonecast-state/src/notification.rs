//! Typed change notifications
//!
//! The store emits exactly one notification per field-level change it
//! detects on a write. Consumers therefore never have to diff state
//! themselves; a fully event-driven bridge sees every transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zonecast_grouping::{GroupId, StreamId};

use crate::model::{ClientId, PlaylistRef, TrackRef, ZoneId};

/// A single observed field change on a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum ZoneChange {
    /// Playback started or stopped
    Playing { old: bool, new: bool },
    /// Zone volume changed
    Volume { old: u8, new: u8 },
    /// Zone mute state changed
    Muted { old: bool, new: bool },
    /// Track repeat toggled
    TrackRepeat { old: bool, new: bool },
    /// Playlist repeat toggled
    PlaylistRepeat { old: bool, new: bool },
    /// Playlist shuffle toggled
    PlaylistShuffle { old: bool, new: bool },
    /// The zone's binding to an actual group changed
    GroupBinding { old: GroupId, new: GroupId },
    /// The zone's stream binding changed
    StreamBinding { old: StreamId, new: StreamId },
    /// Desired membership changed
    Members {
        old: Vec<ClientId>,
        new: Vec<ClientId>,
    },
    /// Selected playlist changed
    Playlist {
        old: Option<PlaylistRef>,
        new: Option<PlaylistRef>,
    },
    /// Selected track changed
    Track {
        old: Option<TrackRef>,
        new: Option<TrackRef>,
    },
}

impl ZoneChange {
    /// Stable key naming the changed field
    pub fn field_key(&self) -> &'static str {
        match self {
            ZoneChange::Playing { .. } => "playing",
            ZoneChange::Volume { .. } => "volume",
            ZoneChange::Muted { .. } => "muted",
            ZoneChange::TrackRepeat { .. } => "track_repeat",
            ZoneChange::PlaylistRepeat { .. } => "playlist_repeat",
            ZoneChange::PlaylistShuffle { .. } => "playlist_shuffle",
            ZoneChange::GroupBinding { .. } => "group_binding",
            ZoneChange::StreamBinding { .. } => "stream_binding",
            ZoneChange::Members { .. } => "members",
            ZoneChange::Playlist { .. } => "playlist",
            ZoneChange::Track { .. } => "track",
        }
    }
}

/// A single observed field change on a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum ClientChange {
    /// Endpoint connected or disconnected
    Connected { old: bool, new: bool },
    /// Client volume changed
    Volume { old: u8, new: u8 },
    /// Client mute state changed
    Muted { old: bool, new: bool },
    /// Latency compensation changed
    Latency { old: i32, new: i32 },
    /// The client moved to a different zone
    ZoneAssignment {
        old: Option<ZoneId>,
        new: Option<ZoneId>,
    },
}

impl ClientChange {
    /// Stable key naming the changed field
    pub fn field_key(&self) -> &'static str {
        match self {
            ClientChange::Connected { .. } => "connected",
            ClientChange::Volume { .. } => "volume",
            ClientChange::Muted { .. } => "muted",
            ClientChange::Latency { .. } => "latency",
            ClientChange::ZoneAssignment { .. } => "zone_assignment",
        }
    }
}

/// One field-level state change, as delivered to outward publishers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum ChangeNotification {
    /// A zone field changed
    Zone {
        /// The zone that changed
        zone: ZoneId,
        /// What changed, with old and new values
        change: ZoneChange,
        /// When the change was detected
        at: DateTime<Utc>,
    },
    /// A client field changed
    Client {
        /// The client that changed
        client: ClientId,
        /// What changed, with old and new values
        change: ClientChange,
        /// When the change was detected
        at: DateTime<Utc>,
    },
}

impl ChangeNotification {
    /// The changed field's stable key
    pub fn field_key(&self) -> &'static str {
        match self {
            ChangeNotification::Zone { change, .. } => change.field_key(),
            ChangeNotification::Client { change, .. } => change.field_key(),
        }
    }

    /// The zone this change concerns, if it is a zone change
    pub fn zone_id(&self) -> Option<ZoneId> {
        match self {
            ChangeNotification::Zone { zone, .. } => Some(*zone),
            ChangeNotification::Client { .. } => None,
        }
    }

    /// The client this change concerns, if it is a client change
    pub fn client_id(&self) -> Option<ClientId> {
        match self {
            ChangeNotification::Zone { .. } => None,
            ChangeNotification::Client { client, .. } => Some(*client),
        }
    }
}
