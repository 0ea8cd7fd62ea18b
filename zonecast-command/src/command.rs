//! Command value types
//!
//! Commands are immutable value objects: once constructed by an ingress
//! adapter they are validated, dispatched, and dropped - never mutated.
//! Every command carries its origin and a correlation ID so a mutation
//! can be traced from protocol ingress to store write.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use zonecast_state::{ClientId, PlaylistRef, TrackRef, ZoneId};

/// Where a command entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandSource {
    /// Generated inside the process (reconciler, startup, tests)
    Internal,
    /// REST/HTTP ingress
    Api,
    /// MQTT ingress
    Mqtt,
    /// KNX bus ingress
    Knx,
}

/// Operations targeting a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ZoneOperation {
    /// Start playback
    Play,
    /// Stop playback
    Stop,
    /// Set the zone volume
    SetVolume { volume: u8 },
    /// Raise the volume, saturating at 100
    VolumeUp { step: u8 },
    /// Lower the volume, saturating at 0
    VolumeDown { step: u8 },
    /// Set the mute state
    SetMute { muted: bool },
    /// Flip the mute state
    ToggleMute,
    /// Enable or disable track repeat
    SetTrackRepeat { enabled: bool },
    /// Enable or disable playlist repeat
    SetPlaylistRepeat { enabled: bool },
    /// Enable or disable playlist shuffle
    SetPlaylistShuffle { enabled: bool },
    /// Select a playlist (clears the current track selection)
    SetPlaylist { playlist: PlaylistRef },
    /// Select a track
    SetTrack { track: TrackRef },
    /// Clear the track selection
    ClearTrack,
}

/// Operations targeting a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClientOperation {
    /// Set the client volume
    SetVolume { volume: u8 },
    /// Raise the volume, saturating at 100
    VolumeUp { step: u8 },
    /// Lower the volume, saturating at 0
    VolumeDown { step: u8 },
    /// Set the mute state
    SetMute { muted: bool },
    /// Flip the mute state
    ToggleMute,
    /// Set latency compensation in milliseconds
    SetLatency { latency_ms: i32 },
    /// Record the endpoint's connection state as reported externally
    SetConnected { connected: bool },
    /// Move the client to a different zone's desired membership
    AssignZone { zone: ZoneId },
}

/// A command's target entity and operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "lowercase")]
pub enum CommandTarget {
    /// Operate on a zone
    Zone { zone: ZoneId, op: ZoneOperation },
    /// Operate on a client
    Client { client: ClientId, op: ClientOperation },
}

/// One validated-and-dispatched unit of intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Target entity and operation
    pub target: CommandTarget,
    /// Origin of the command
    pub source: CommandSource,
    /// Correlation ID for tracing the command across boundaries
    pub correlation_id: Uuid,
}

impl Command {
    /// Build a zone command with a fresh correlation ID
    pub fn zone(zone: ZoneId, op: ZoneOperation, source: CommandSource) -> Self {
        Self {
            target: CommandTarget::Zone { zone, op },
            source,
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Build a client command with a fresh correlation ID
    pub fn client(client: ClientId, op: ClientOperation, source: CommandSource) -> Self {
        Self {
            target: CommandTarget::Client { client, op },
            source,
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Carry a correlation ID supplied by the ingress adapter
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = id;
        self
    }
}

/// Result of a successfully dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandOutcome {
    /// The desired state changed; notifications were emitted
    Applied,
    /// The desired state already matched; nothing was written or emitted
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_assign_correlation_ids() {
        let a = Command::zone(ZoneId::new(1), ZoneOperation::Play, CommandSource::Api);
        let b = Command::zone(ZoneId::new(1), ZoneOperation::Play, CommandSource::Api);
        assert_ne!(a.correlation_id, b.correlation_id);
    }

    #[test]
    fn test_supplied_correlation_id_kept() {
        let id = Uuid::new_v4();
        let cmd = Command::client(
            ClientId::new(1),
            ClientOperation::SetMute { muted: true },
            CommandSource::Mqtt,
        )
        .with_correlation_id(id);
        assert_eq!(cmd.correlation_id, id);
    }

    #[test]
    fn test_wire_shape() {
        let cmd = Command::zone(
            ZoneId::new(2),
            ZoneOperation::SetVolume { volume: 35 },
            CommandSource::Knx,
        );
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"target\":\"zone\""));
        assert!(json.contains("\"op\":\"set_volume\""));
        assert!(json.contains("\"source\":\"knx\""));
    }
}
