//! Periodic reconciliation sweep
//!
//! Runs `reconcile()` on a fixed interval, independent of request
//! traffic. The interval is the installation's maximum self-healing
//! latency under passive drift. A failed tick is logged and the cadence
//! continues; nothing is escalated from a single miss.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout};

use crate::engine::Reconciler;
use crate::error::{ReconcileError, Result};

/// Handle to the background sweep task
///
/// Dropping the handle without calling [`ReconcilerTask::shutdown`]
/// aborts nothing; the task keeps running for the life of the runtime.
pub struct ReconcilerTask {
    background_task: Option<JoinHandle<()>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl ReconcilerTask {
    /// Spawn the periodic sweep
    pub fn start(reconciler: Arc<Reconciler>, sweep_interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let background_task = tokio::spawn(Self::sweep_task(reconciler, sweep_interval, shutdown_rx));

        Self {
            background_task: Some(background_task),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Signal the sweep to stop and wait up to 5 seconds for it
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(()).await;
        }

        if let Some(task) = self.background_task.take() {
            match timeout(Duration::from_secs(5), task).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(ReconcileError::Shutdown(format!("sweep task panicked: {e}"))),
                Err(_) => Err(ReconcileError::Shutdown(
                    "sweep task shutdown timed out after 5 seconds".to_string(),
                )),
            }
        } else {
            Ok(())
        }
    }

    async fn sweep_task(
        reconciler: Arc<Reconciler>,
        sweep_interval: Duration,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let mut ticker = interval(sweep_interval);
        // The first tick fires immediately; skip it so startup does not
        // race installation seeding.
        ticker.tick().await;

        tracing::info!(interval = ?sweep_interval, "reconciliation sweep started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    Self::run_tick(&reconciler).await;
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }

        tracing::info!("reconciliation sweep stopped");
    }

    async fn run_tick(reconciler: &Reconciler) {
        match reconciler.reconcile().await {
            Ok(outcome) if outcome.is_converged() => {
                if outcome.corrected.is_empty() {
                    tracing::debug!("sweep tick: nothing to correct");
                } else {
                    tracing::info!(zones = ?outcome.corrected, "sweep tick corrected zones");
                }
            }
            Ok(outcome) => {
                tracing::warn!(
                    residual = outcome.residual.len(),
                    "sweep tick left residual splits"
                );
            }
            Err(e) if e.is_transient() => {
                // Indistinguishable from a network blip; the next tick
                // retries on the normal cadence.
                tracing::warn!(error = %e, "sweep tick skipped: external system unavailable");
            }
            Err(e) => {
                tracing::error!(error = %e, "sweep tick failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecast_grouping::testing::FakeGrouping;
    use zonecast_grouping::{ExternalClientId, GroupId, GroupingAdapter, StreamId};
    use zonecast_state::{ClientId, ClientState, TopologyStore, ZoneId, ZoneState};

    fn seeded() -> (Arc<TopologyStore>, Arc<FakeGrouping>) {
        let store = Arc::new(TopologyStore::new());
        store
            .init_zone(
                ZoneId::new(1),
                ZoneState::new(
                    "Zone",
                    "mdi:speaker",
                    StreamId::new("s"),
                    vec![ClientId::new(1), ClientId::new(2)],
                ),
            )
            .unwrap();
        for (i, name) in ["a", "b"].iter().enumerate() {
            store
                .init_client(
                    ClientId::new(i as u32 + 1),
                    ClientState::new(ExternalClientId::new(*name), *name, "00:00:00:00:00:00"),
                )
                .unwrap();
        }
        let fake = Arc::new(FakeGrouping::new());
        fake.set_groups(vec![(
            GroupId::new("g1"),
            vec![ExternalClientId::new("a"), ExternalClientId::new("b")],
        )]);
        (store, fake)
    }

    #[tokio::test]
    async fn test_periodic_tick_heals_drift() {
        let (store, fake) = seeded();
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&store),
            Arc::clone(&fake) as Arc<dyn GroupingAdapter>,
        ));

        let task = ReconcilerTask::start(Arc::clone(&reconciler), Duration::from_millis(20));

        // Inject drift: "a" wanders off into its own group.
        fake.set_groups(vec![
            (GroupId::new("g1"), vec![ExternalClientId::new("b")]),
            (GroupId::new("g9"), vec![ExternalClientId::new("a")]),
        ]);

        // A couple of ticks is plenty to self-heal.
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(reconciler.validate().await.unwrap().is_cohesive());

        task.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_tick_does_not_stop_the_sweep() {
        let (store, fake) = seeded();
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&store),
            Arc::clone(&fake) as Arc<dyn GroupingAdapter>,
        ));

        let task = ReconcilerTask::start(Arc::clone(&reconciler), Duration::from_millis(20));

        fake.fail_next(zonecast_grouping::GroupingError::Unreachable("down".into()));
        fake.set_groups(vec![
            (GroupId::new("g1"), vec![ExternalClientId::new("b")]),
            (GroupId::new("g9"), vec![ExternalClientId::new("a")]),
        ]);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(reconciler.validate().await.unwrap().is_cohesive());

        task.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_is_clean() {
        let (store, fake) = seeded();
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&store),
            Arc::clone(&fake) as Arc<dyn GroupingAdapter>,
        ));
        let task = ReconcilerTask::start(reconciler, Duration::from_secs(3600));
        assert!(task.shutdown().await.is_ok());
    }
}
