//! Topology store with per-key atomic replace-and-diff
//!
//! The `TopologyStore` is the single source of truth for desired zone
//! and client state. Every write replaces the stored value for one key
//! atomically, compares the observable fields of old vs. new explicitly,
//! and emits one [`ChangeNotification`] per differing field on a
//! broadcast channel.
//!
//! # Architecture
//!
//! ```text
//! TopologyStore
//! ├── zones:   RwLock<HashMap<ZoneId, ZoneState>>
//! ├── clients: RwLock<HashMap<ClientId, ClientState>>
//! └── changes_tx: broadcast::Sender<ChangeNotification>
//! ```
//!
//! Reads return cloned snapshots, never live views; writers cannot
//! produce torn updates because a key's value is swapped whole under the
//! write lock. There are no cross-key transactions - the one cross-zone
//! operation, [`TopologyStore::reassign_client`], runs both membership
//! edits under a single write lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::error::{Result, StateError};
use crate::model::{ClientId, ClientState, ZoneId, ZoneState};
use crate::notification::{ChangeNotification, ClientChange, ZoneChange};

/// Buffer size of the change broadcast channel
const CHANGE_CHANNEL_CAPACITY: usize = 1000;

/// Canonical in-memory desired/observed topology state
pub struct TopologyStore {
    zones: Arc<RwLock<HashMap<ZoneId, ZoneState>>>,
    clients: Arc<RwLock<HashMap<ClientId, ClientState>>>,
    changes_tx: broadcast::Sender<ChangeNotification>,
}

impl TopologyStore {
    /// Create a new empty store
    pub fn new() -> Self {
        let (changes_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            zones: Arc::new(RwLock::new(HashMap::new())),
            clients: Arc::new(RwLock::new(HashMap::new())),
            changes_tx,
        }
    }

    /// Subscribe to all change notifications
    ///
    /// The channel is bounded; a receiver that falls more than the buffer
    /// size behind observes a lag error and skips ahead. The store never
    /// blocks on slow subscribers.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeNotification> {
        self.changes_tx.subscribe()
    }

    // ========================================================================
    // Startup initialization
    // ========================================================================

    /// Insert a zone if the index is not yet populated
    ///
    /// Idempotent: re-initialization of an existing index is a no-op, so
    /// racing startup paths cannot clobber already-initialized state.
    /// Returns whether the entry was inserted. Emits no notification.
    pub fn init_zone(&self, id: ZoneId, state: ZoneState) -> Result<bool> {
        let mut zones = self.zones.write().map_err(|_| StateError::LockPoisoned)?;
        if zones.contains_key(&id) {
            return Ok(false);
        }
        zones.insert(id, state);
        Ok(true)
    }

    /// Insert a client if the index is not yet populated
    ///
    /// Same idempotency contract as [`TopologyStore::init_zone`].
    pub fn init_client(&self, id: ClientId, state: ClientState) -> Result<bool> {
        let mut clients = self.clients.write().map_err(|_| StateError::LockPoisoned)?;
        if clients.contains_key(&id) {
            return Ok(false);
        }
        clients.insert(id, state);
        Ok(true)
    }

    // ========================================================================
    // Reading (cloned snapshots)
    // ========================================================================

    /// Get a zone's current state
    pub fn zone(&self, id: &ZoneId) -> Option<ZoneState> {
        self.zones.read().ok()?.get(id).cloned()
    }

    /// Get a client's current state
    pub fn client(&self, id: &ClientId) -> Option<ClientState> {
        self.clients.read().ok()?.get(id).cloned()
    }

    /// Snapshot of all zones
    pub fn zones(&self) -> HashMap<ZoneId, ZoneState> {
        self.zones.read().map(|z| z.clone()).unwrap_or_default()
    }

    /// Snapshot of all clients
    pub fn clients(&self) -> HashMap<ClientId, ClientState> {
        self.clients.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// All zone IDs, ascending
    pub fn zone_ids(&self) -> Vec<ZoneId> {
        let mut ids: Vec<ZoneId> = self
            .zones
            .read()
            .map(|z| z.keys().copied().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Number of configured zones
    pub fn zone_count(&self) -> usize {
        self.zones.read().map(|z| z.len()).unwrap_or(0)
    }

    /// Number of configured clients
    pub fn client_count(&self) -> usize {
        self.clients.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Find the zone whose desired membership contains a client
    pub fn zone_of_client(&self, client: &ClientId) -> Option<ZoneId> {
        let zones = self.zones.read().ok()?;
        zones
            .iter()
            .find(|(_, z)| z.contains_client(client))
            .map(|(id, _)| *id)
    }

    // ========================================================================
    // Writing (atomic replace + diff)
    // ========================================================================

    /// Replace a zone's state, emitting one notification per changed field
    ///
    /// Writing a state equal to the stored one is a no-op: nothing is
    /// replaced and nothing is emitted.
    pub fn set_zone(&self, id: &ZoneId, mut state: ZoneState) -> Result<()> {
        let changes = {
            let mut zones = self.zones.write().map_err(|_| StateError::LockPoisoned)?;
            let current = zones.get(id).ok_or(StateError::UnknownZone(*id))?;

            let changes = diff_zones(current, &state);
            if changes.is_empty() {
                return Ok(());
            }
            state.updated_at = Utc::now();
            zones.insert(*id, state);
            changes
        };

        // Emitted after the lock is released; the channel send itself
        // never blocks.
        for change in changes {
            self.emit(ChangeNotification::Zone {
                zone: *id,
                change,
                at: Utc::now(),
            });
        }
        Ok(())
    }

    /// Replace a client's state, emitting one notification per changed field
    pub fn set_client(&self, id: &ClientId, mut state: ClientState) -> Result<()> {
        let changes = {
            let mut clients = self.clients.write().map_err(|_| StateError::LockPoisoned)?;
            let current = clients.get(id).ok_or(StateError::UnknownClient(*id))?;

            let changes = diff_clients(current, &state);
            if changes.is_empty() {
                return Ok(());
            }
            state.updated_at = Utc::now();
            clients.insert(*id, state);
            changes
        };

        for change in changes {
            self.emit(ChangeNotification::Client {
                client: *id,
                change,
                at: Utc::now(),
            });
        }
        Ok(())
    }

    /// Move a client's desired membership to another zone
    ///
    /// Removes the client from its current zone's members and appends it
    /// to the target's, as one logical operation under a single write
    /// lock. Emits a `Members` change for each touched zone and a
    /// `ZoneAssignment` change for the client. Reassigning a client to
    /// the zone it is already in is a no-op success.
    pub fn reassign_client(&self, client: &ClientId, to: &ZoneId) -> Result<()> {
        {
            let clients = self.clients.read().map_err(|_| StateError::LockPoisoned)?;
            if !clients.contains_key(client) {
                return Err(StateError::UnknownClient(*client));
            }
        }

        let mut notifications = Vec::new();
        {
            let mut zones = self.zones.write().map_err(|_| StateError::LockPoisoned)?;
            if !zones.contains_key(to) {
                return Err(StateError::UnknownZone(*to));
            }

            let from = zones
                .iter()
                .find(|(_, z)| z.contains_client(client))
                .map(|(id, _)| *id);
            if from == Some(*to) {
                return Ok(());
            }

            let now = Utc::now();
            if let Some(from_id) = from {
                let source = zones.get_mut(&from_id).expect("zone present under held lock");
                let old = source.members.clone();
                source.members.retain(|m| m != client);
                source.updated_at = now;
                notifications.push(ChangeNotification::Zone {
                    zone: from_id,
                    change: ZoneChange::Members {
                        old,
                        new: source.members.clone(),
                    },
                    at: now,
                });
            }

            let target = zones.get_mut(to).expect("zone present under held lock");
            let old = target.members.clone();
            target.members.push(*client);
            target.updated_at = now;
            notifications.push(ChangeNotification::Zone {
                zone: *to,
                change: ZoneChange::Members {
                    old,
                    new: target.members.clone(),
                },
                at: now,
            });

            notifications.push(ChangeNotification::Client {
                client: *client,
                change: ClientChange::ZoneAssignment {
                    old: from,
                    new: Some(*to),
                },
                at: now,
            });
        }

        for n in notifications {
            self.emit(n);
        }
        Ok(())
    }

    fn emit(&self, notification: ChangeNotification) {
        tracing::trace!(field = notification.field_key(), "state change");
        // send() only fails when there are no subscribers, which is fine.
        let _ = self.changes_tx.send(notification);
    }
}

impl Default for TopologyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TopologyStore {
    /// Clones share the same underlying state and change channel
    fn clone(&self) -> Self {
        Self {
            zones: Arc::clone(&self.zones),
            clients: Arc::clone(&self.clients),
            changes_tx: self.changes_tx.clone(),
        }
    }
}

impl std::fmt::Debug for TopologyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopologyStore")
            .field("zone_count", &self.zone_count())
            .field("client_count", &self.client_count())
            .finish()
    }
}

// ============================================================================
// Field diffing - enumerated explicitly, never reflective
// ============================================================================

fn diff_zones(old: &ZoneState, new: &ZoneState) -> Vec<ZoneChange> {
    let mut changes = Vec::new();
    if old.playing != new.playing {
        changes.push(ZoneChange::Playing {
            old: old.playing,
            new: new.playing,
        });
    }
    if old.volume != new.volume {
        changes.push(ZoneChange::Volume {
            old: old.volume,
            new: new.volume,
        });
    }
    if old.muted != new.muted {
        changes.push(ZoneChange::Muted {
            old: old.muted,
            new: new.muted,
        });
    }
    if old.track_repeat != new.track_repeat {
        changes.push(ZoneChange::TrackRepeat {
            old: old.track_repeat,
            new: new.track_repeat,
        });
    }
    if old.playlist_repeat != new.playlist_repeat {
        changes.push(ZoneChange::PlaylistRepeat {
            old: old.playlist_repeat,
            new: new.playlist_repeat,
        });
    }
    if old.playlist_shuffle != new.playlist_shuffle {
        changes.push(ZoneChange::PlaylistShuffle {
            old: old.playlist_shuffle,
            new: new.playlist_shuffle,
        });
    }
    if old.group_id != new.group_id {
        changes.push(ZoneChange::GroupBinding {
            old: old.group_id.clone(),
            new: new.group_id.clone(),
        });
    }
    if old.stream_id != new.stream_id {
        changes.push(ZoneChange::StreamBinding {
            old: old.stream_id.clone(),
            new: new.stream_id.clone(),
        });
    }
    if old.members != new.members {
        changes.push(ZoneChange::Members {
            old: old.members.clone(),
            new: new.members.clone(),
        });
    }
    if old.current_playlist != new.current_playlist {
        changes.push(ZoneChange::Playlist {
            old: old.current_playlist.clone(),
            new: new.current_playlist.clone(),
        });
    }
    if old.current_track != new.current_track {
        changes.push(ZoneChange::Track {
            old: old.current_track.clone(),
            new: new.current_track.clone(),
        });
    }
    changes
}

fn diff_clients(old: &ClientState, new: &ClientState) -> Vec<ClientChange> {
    let mut changes = Vec::new();
    if old.connected != new.connected {
        changes.push(ClientChange::Connected {
            old: old.connected,
            new: new.connected,
        });
    }
    if old.volume != new.volume {
        changes.push(ClientChange::Volume {
            old: old.volume,
            new: new.volume,
        });
    }
    if old.muted != new.muted {
        changes.push(ClientChange::Muted {
            old: old.muted,
            new: new.muted,
        });
    }
    if old.latency_ms != new.latency_ms {
        changes.push(ClientChange::Latency {
            old: old.latency_ms,
            new: new.latency_ms,
        });
    }
    changes
}

// ============================================================================
// Tests
// ============================================================================
