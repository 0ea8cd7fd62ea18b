//! Notification fan-out
//!
//! Decouples state mutation from outward propagation: the store's
//! broadcast channel is the synchronous enqueue, and one forwarding task
//! per registered publisher performs asynchronous delivery. Each task
//! drains its own receiver sequentially, so every publisher observes the
//! store's emission order (per-entity FIFO included) while a slow or
//! failing publisher lags only itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use zonecast_state::TopologyStore;

use crate::publisher::OutwardPublisher;

/// Errors from fan-out lifecycle management
#[derive(Debug, thiserror::Error)]
pub enum FanoutError {
    /// A forwarding task did not stop within the shutdown window
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

/// Handle to the running fan-out tasks
pub struct Fanout {
    tasks: Vec<JoinHandle<()>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Fanout {
    /// Spawn one forwarding task per publisher
    ///
    /// Each task subscribes to the store independently, so publishers do
    /// not share a queue position.
    pub fn start(store: &TopologyStore, publishers: Vec<Arc<dyn OutwardPublisher>>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let tasks = publishers
            .into_iter()
            .map(|publisher| {
                let changes = store.subscribe_changes();
                let shutdown = shutdown_tx.subscribe();
                tokio::spawn(Self::forward_task(publisher, changes, shutdown))
            })
            .collect();

        Self { tasks, shutdown_tx }
    }

    /// Stop all forwarding tasks, waiting up to 5 seconds
    pub async fn shutdown(self) -> Result<(), FanoutError> {
        let _ = self.shutdown_tx.send(());

        for task in self.tasks {
            match timeout(Duration::from_secs(5), task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    return Err(FanoutError::Shutdown(format!("forward task panicked: {e}")))
                }
                Err(_) => {
                    return Err(FanoutError::Shutdown(
                        "forward task shutdown timed out after 5 seconds".to_string(),
                    ))
                }
            }
        }
        Ok(())
    }

    async fn forward_task(
        publisher: Arc<dyn OutwardPublisher>,
        mut changes: broadcast::Receiver<zonecast_state::ChangeNotification>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::debug!(publisher = publisher.name(), "fan-out task started");

        loop {
            let change = tokio::select! {
                received = changes.recv() => match received {
                    Ok(change) => change,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(
                            publisher = publisher.name(),
                            missed,
                            "publisher fell behind; notifications dropped"
                        );
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = shutdown.recv() => break,
            };

            // Shutdown interrupts an in-flight delivery; the bridge is
            // going away anyway.
            tokio::select! {
                result = publisher.publish(&change) => {
                    if let Err(e) = result {
                        // Delivery errors never reach the mutating
                        // command; log and move on.
                        tracing::warn!(
                            publisher = publisher.name(),
                            field = change.field_key(),
                            error = %e,
                            "outward delivery failed"
                        );
                    }
                }
                _ = shutdown.recv() => break,
            }
        }

        tracing::debug!(publisher = publisher.name(), "fan-out task stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use zonecast_grouping::{ExternalClientId, StreamId};
    use zonecast_state::{
        ChangeNotification, ClientId, ClientState, ZoneId, ZoneState,
    };

    use crate::publisher::PublishError;

    /// Publisher that records everything it receives
    struct Recording {
        name: String,
        seen: Mutex<Vec<ChangeNotification>>,
    }

    impl Recording {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<ChangeNotification> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OutwardPublisher for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        async fn publish(&self, change: &ChangeNotification) -> Result<(), PublishError> {
            self.seen.lock().unwrap().push(change.clone());
            Ok(())
        }
    }

    /// Publisher that always fails
    struct Failing;

    #[async_trait]
    impl OutwardPublisher for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn publish(&self, _change: &ChangeNotification) -> Result<(), PublishError> {
            Err(PublishError::Transport("broker gone".into()))
        }
    }

    fn seeded() -> Arc<TopologyStore> {
        let store = Arc::new(TopologyStore::new());
        store
            .init_zone(
                ZoneId::new(1),
                ZoneState::new("Zone", "mdi:speaker", StreamId::new("s"), vec![ClientId::new(1)]),
            )
            .unwrap();
        store
            .init_client(
                ClientId::new(1),
                ClientState::new(ExternalClientId::new("a"), "a", "00:00:00:00:00:00"),
            )
            .unwrap();
        store
    }

    async fn set_volume(store: &TopologyStore, volume: u8) {
        let mut zone = store.zone(&ZoneId::new(1)).unwrap();
        zone.volume = volume;
        store.set_zone(&ZoneId::new(1), zone).unwrap();
    }

    #[tokio::test]
    async fn test_changes_are_delivered() {
        let store = seeded();
        let recording = Recording::new("mqtt");
        let fanout = Fanout::start(&store, vec![recording.clone()]);

        set_volume(&store, 10).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let seen = recording.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].field_key(), "volume");

        fanout.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_per_entity_order_preserved() {
        let store = seeded();
        let recording = Recording::new("mqtt");
        let fanout = Fanout::start(&store, vec![recording.clone()]);

        for volume in [10u8, 20, 30] {
            set_volume(&store, volume).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        let volumes: Vec<u8> = recording
            .seen()
            .iter()
            .filter_map(|n| match n {
                ChangeNotification::Zone {
                    change: zonecast_state::ZoneChange::Volume { new, .. },
                    ..
                } => Some(*new),
                _ => None,
            })
            .collect();
        assert_eq!(volumes, vec![10, 20, 30]);

        fanout.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_publisher_does_not_affect_others() {
        let store = seeded();
        let recording = Recording::new("knx");
        let fanout = Fanout::start(&store, vec![Arc::new(Failing), recording.clone()]);

        set_volume(&store, 25).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(recording.seen().len(), 1);

        fanout.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_mutation_does_not_wait_for_delivery() {
        let store = seeded();

        /// Publisher that blocks for a long time on every delivery
        struct Slow;

        #[async_trait]
        impl OutwardPublisher for Slow {
            fn name(&self) -> &str {
                "slow"
            }

            async fn publish(&self, _c: &ChangeNotification) -> Result<(), PublishError> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }

        let fanout = Fanout::start(&store, vec![Arc::new(Slow)]);

        // The write returns immediately regardless of the stuck consumer.
        let started = std::time::Instant::now();
        set_volume(&store, 60).await;
        assert!(started.elapsed() < Duration::from_millis(100));

        // Shutdown interrupts the in-flight sleep via the select.
        fanout.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_without_traffic() {
        let store = seeded();
        let fanout = Fanout::start(&store, vec![Recording::new("mqtt")]);
        assert!(fanout.shutdown().await.is_ok());
    }
}
