//! Command dispatch
//!
//! The dispatcher is the single entry point every ingress adapter calls.
//! It validates structurally, serializes mutations per target entity,
//! applies exactly one net mutation per command through the store, and
//! returns a typed outcome. Tokio mutexes hand out permits in FIFO
//! order, so commands for one entity apply in the order they arrived;
//! commands for different entities run concurrently.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::timeout;

use zonecast_state::{ClientId, TopologyStore, ZoneId};

use crate::command::{ClientOperation, Command, CommandOutcome, CommandTarget};
use crate::error::{CommandError, Result};
use crate::{handlers, validate};

/// Default per-dispatch deadline
const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TargetKey {
    Zone(ZoneId),
    Client(ClientId),
}

/// Validates and applies commands against the topology store
pub struct CommandDispatcher {
    store: Arc<TopologyStore>,
    locks: DashMap<TargetKey, Arc<Mutex<()>>>,
    deadline: Duration,
}

impl CommandDispatcher {
    /// Create a dispatcher with the default deadline
    pub fn new(store: Arc<TopologyStore>) -> Self {
        Self::with_deadline(store, DEFAULT_DEADLINE)
    }

    /// Create a dispatcher with an explicit per-dispatch deadline
    pub fn with_deadline(store: Arc<TopologyStore>, deadline: Duration) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            deadline,
        }
    }

    /// Validate and apply one command
    ///
    /// Validation failures mutate nothing. A deadline expiry surfaces as
    /// [`CommandError::DeadlineExpired`], distinguishable from every
    /// validation fault.
    pub async fn dispatch(&self, command: Command) -> Result<CommandOutcome> {
        validate::command(&command, &self.store)?;

        tracing::debug!(
            correlation_id = %command.correlation_id,
            source = ?command.source,
            "dispatching command"
        );

        let key = match &command.target {
            CommandTarget::Zone { zone, .. } => TargetKey::Zone(*zone),
            CommandTarget::Client { client, .. } => TargetKey::Client(*client),
        };
        let lock = self.entity_lock(key);

        let outcome = match timeout(self.deadline, async {
            let _guard = lock.lock().await;
            self.apply(&command)
        })
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(CommandError::DeadlineExpired),
        };

        tracing::debug!(
            correlation_id = %command.correlation_id,
            outcome = ?outcome,
            "command dispatched"
        );
        Ok(outcome)
    }

    /// Compute and write the new desired state for one command
    ///
    /// Runs under the target's entity lock. Re-reads current state after
    /// acquisition so two queued commands never apply to the same base.
    fn apply(&self, command: &Command) -> Result<CommandOutcome> {
        match &command.target {
            CommandTarget::Zone { zone, op } => {
                let current = self
                    .store
                    .zone(zone)
                    .ok_or(CommandError::UnknownZone(*zone))?;
                let mut next = current.clone();
                handlers::apply_zone(op, &mut next);
                if next == current {
                    return Ok(CommandOutcome::Unchanged);
                }
                self.store.set_zone(zone, next)?;
                Ok(CommandOutcome::Applied)
            }
            CommandTarget::Client {
                client,
                op: ClientOperation::AssignZone { zone },
            } => {
                // Reassignment touches both zones' member lists as one
                // logical store operation.
                if self.store.zone_of_client(client) == Some(*zone) {
                    return Ok(CommandOutcome::Unchanged);
                }
                self.store.reassign_client(client, zone)?;
                Ok(CommandOutcome::Applied)
            }
            CommandTarget::Client { client, op } => {
                let current = self
                    .store
                    .client(client)
                    .ok_or(CommandError::UnknownClient(*client))?;
                let mut next = current.clone();
                handlers::apply_client(op, &mut next);
                if next == current {
                    return Ok(CommandOutcome::Unchanged);
                }
                self.store.set_client(client, next)?;
                Ok(CommandOutcome::Applied)
            }
        }
    }

    fn entity_lock(&self, key: TargetKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    fn zone_lock_for_test(&self, zone: ZoneId) -> Arc<Mutex<()>> {
        self.entity_lock(TargetKey::Zone(zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecast_grouping::{ExternalClientId, StreamId};
    use zonecast_state::{ClientState, ZoneState};

    use crate::command::{CommandSource, ZoneOperation};

    fn seeded() -> Arc<TopologyStore> {
        let store = Arc::new(TopologyStore::new());
        store
            .init_zone(
                ZoneId::new(1),
                ZoneState::new(
                    "Ground Floor",
                    "mdi:home",
                    StreamId::new("radio"),
                    vec![ClientId::new(1), ClientId::new(2)],
                ),
            )
            .unwrap();
        store
            .init_zone(
                ZoneId::new(2),
                ZoneState::new("Bedroom", "mdi:bed", StreamId::new("spotify"), vec![ClientId::new(3)]),
            )
            .unwrap();
        for (i, name) in ["living-room", "kitchen", "bedroom"].iter().enumerate() {
            store
                .init_client(
                    ClientId::new(i as u32 + 1),
                    ClientState::new(ExternalClientId::new(*name), *name, "00:00:00:00:00:00"),
                )
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_set_volume_applies_and_notifies_once() {
        let store = seeded();
        let dispatcher = CommandDispatcher::new(Arc::clone(&store));
        let mut rx = store.subscribe_changes();

        let outcome = dispatcher
            .dispatch(Command::zone(
                ZoneId::new(1),
                ZoneOperation::SetVolume { volume: 42 },
                CommandSource::Api,
            ))
            .await
            .unwrap();

        assert_eq!(outcome, CommandOutcome::Applied);
        assert_eq!(store.zone(&ZoneId::new(1)).unwrap().volume, 42);
        assert_eq!(rx.try_recv().unwrap().field_key(), "volume");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_identical_command_is_noop_success() {
        let store = seeded();
        let dispatcher = CommandDispatcher::new(Arc::clone(&store));

        let cmd = Command::zone(
            ZoneId::new(1),
            ZoneOperation::SetVolume { volume: 42 },
            CommandSource::Api,
        );
        dispatcher.dispatch(cmd.clone()).await.unwrap();

        let mut rx = store.subscribe_changes();
        let outcome = dispatcher.dispatch(cmd).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Unchanged);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_validation_failure_mutates_nothing() {
        let store = seeded();
        let dispatcher = CommandDispatcher::new(Arc::clone(&store));
        let mut rx = store.subscribe_changes();

        let err = dispatcher
            .dispatch(Command::zone(
                ZoneId::new(1),
                ZoneOperation::SetVolume { volume: 130 },
                CommandSource::Mqtt,
            ))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.zone(&ZoneId::new(1)).unwrap().volume, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reassignment_moves_membership() {
        let store = seeded();
        let dispatcher = CommandDispatcher::new(Arc::clone(&store));

        let outcome = dispatcher
            .dispatch(Command::client(
                ClientId::new(2),
                ClientOperation::AssignZone { zone: ZoneId::new(2) },
                CommandSource::Api,
            ))
            .await
            .unwrap();

        assert_eq!(outcome, CommandOutcome::Applied);
        assert_eq!(store.zone_of_client(&ClientId::new(2)), Some(ZoneId::new(2)));

        // Already there: no-op success
        let outcome = dispatcher
            .dispatch(Command::client(
                ClientId::new(2),
                ClientOperation::AssignZone { zone: ZoneId::new(2) },
                CommandSource::Api,
            ))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_deadline_expiry_is_not_a_validation_fault() {
        let store = seeded();
        let dispatcher =
            CommandDispatcher::with_deadline(Arc::clone(&store), Duration::from_millis(20));

        // Hold the zone's entity lock so the dispatch cannot proceed.
        let lock = dispatcher.zone_lock_for_test(ZoneId::new(1));
        let _guard = lock.lock().await;

        let err = dispatcher
            .dispatch(Command::zone(
                ZoneId::new(1),
                ZoneOperation::Play,
                CommandSource::Api,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::DeadlineExpired));
        assert!(!err.is_validation());
        assert!(!store.zone(&ZoneId::new(1)).unwrap().playing);
    }

    #[tokio::test]
    async fn test_commands_for_one_zone_apply_in_order() {
        let store = seeded();
        let dispatcher = Arc::new(CommandDispatcher::new(Arc::clone(&store)));

        for volume in [10u8, 20, 30, 40] {
            dispatcher
                .dispatch(Command::zone(
                    ZoneId::new(1),
                    ZoneOperation::SetVolume { volume },
                    CommandSource::Api,
                ))
                .await
                .unwrap();
        }
        assert_eq!(store.zone(&ZoneId::new(1)).unwrap().volume, 40);
    }

    #[tokio::test]
    async fn test_relative_volume_through_dispatch() {
        let store = seeded();
        let dispatcher = CommandDispatcher::new(Arc::clone(&store));

        dispatcher
            .dispatch(Command::zone(
                ZoneId::new(1),
                ZoneOperation::SetVolume { volume: 95 },
                CommandSource::Api,
            ))
            .await
            .unwrap();
        dispatcher
            .dispatch(Command::zone(
                ZoneId::new(1),
                ZoneOperation::VolumeUp { step: 20 },
                CommandSource::Knx,
            ))
            .await
            .unwrap();

        assert_eq!(store.zone(&ZoneId::new(1)).unwrap().volume, 100);
    }
}
