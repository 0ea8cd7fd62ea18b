//! Operation handlers
//!
//! One handler arm per operation, selected by an exhaustive match: the
//! dispatch table is fixed at compile time, so adding an operation
//! without wiring a handler refuses to build. Handlers compute the new
//! desired state on a clone; the store write (and the notifications it
//! emits) belongs to the dispatcher.

use zonecast_state::{ClientState, ZoneState};

use crate::command::{ClientOperation, ZoneOperation};

/// Apply a zone operation to a copy of the zone's state
pub(crate) fn apply_zone(op: &ZoneOperation, zone: &mut ZoneState) {
    match op {
        ZoneOperation::Play => zone.playing = true,
        ZoneOperation::Stop => zone.playing = false,
        ZoneOperation::SetVolume { volume } => zone.volume = *volume,
        ZoneOperation::VolumeUp { step } => {
            zone.volume = zone.volume.saturating_add(*step).min(100);
        }
        ZoneOperation::VolumeDown { step } => {
            zone.volume = zone.volume.saturating_sub(*step);
        }
        ZoneOperation::SetMute { muted } => zone.muted = *muted,
        ZoneOperation::ToggleMute => zone.muted = !zone.muted,
        ZoneOperation::SetTrackRepeat { enabled } => zone.track_repeat = *enabled,
        ZoneOperation::SetPlaylistRepeat { enabled } => zone.playlist_repeat = *enabled,
        ZoneOperation::SetPlaylistShuffle { enabled } => zone.playlist_shuffle = *enabled,
        ZoneOperation::SetPlaylist { playlist } => {
            // Selecting a playlist invalidates the previous track choice.
            zone.current_playlist = Some(playlist.clone());
            zone.current_track = None;
        }
        ZoneOperation::SetTrack { track } => zone.current_track = Some(track.clone()),
        ZoneOperation::ClearTrack => zone.current_track = None,
    }
}

/// Apply a client operation to a copy of the client's state
///
/// `AssignZone` is absent here: membership lives on zones, and the
/// dispatcher routes it through the store's reassignment operation.
pub(crate) fn apply_client(op: &ClientOperation, client: &mut ClientState) {
    match op {
        ClientOperation::SetVolume { volume } => client.volume = *volume,
        ClientOperation::VolumeUp { step } => {
            client.volume = client.volume.saturating_add(*step).min(100);
        }
        ClientOperation::VolumeDown { step } => {
            client.volume = client.volume.saturating_sub(*step);
        }
        ClientOperation::SetMute { muted } => client.muted = *muted,
        ClientOperation::ToggleMute => client.muted = !client.muted,
        ClientOperation::SetLatency { latency_ms } => client.latency_ms = *latency_ms,
        ClientOperation::SetConnected { connected } => client.connected = *connected,
        ClientOperation::AssignZone { .. } => {}
    }
}
