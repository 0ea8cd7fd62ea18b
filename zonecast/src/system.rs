//! System facade
//!
//! `ZonecastSystem` wires the store, command dispatcher, reconciler,
//! periodic sweep, and notification fan-out into one explicitly owned
//! object. Nothing here is a process-wide singleton: whoever constructs
//! the system decides who gets a handle to it.

use std::sync::Arc;

use zonecast_command::{Command, CommandDispatcher, CommandOutcome};
use zonecast_grouping::GroupingAdapter;
use zonecast_notify::{Fanout, OutwardPublisher};
use zonecast_reconciler::{Reconciler, ReconcilerTask};
use zonecast_state::{GroupingHealth, TopologyStore, ZoneId};

use crate::config::InstallationConfig;
use crate::error::SystemError;
use crate::report::{ReconcileReport, SystemStatus, ValidationReport, ValidationStatus};

/// The assembled controller core
///
/// Construct one per process with [`ZonecastSystem::start`] inside a
/// tokio runtime; the periodic sweep and fan-out tasks live until
/// [`ZonecastSystem::shutdown`].
pub struct ZonecastSystem {
    store: Arc<TopologyStore>,
    dispatcher: CommandDispatcher,
    reconciler: Arc<Reconciler>,
    sweep: Option<ReconcilerTask>,
    fanout: Option<Fanout>,
}

impl ZonecastSystem {
    /// Seed the topology from config and start the background tasks
    ///
    /// Publishers are registered here, once, for the life of the system.
    pub fn start(
        config: InstallationConfig,
        adapter: Arc<dyn GroupingAdapter>,
        publishers: Vec<Arc<dyn OutwardPublisher>>,
    ) -> Result<Self, SystemError> {
        let store = Arc::new(TopologyStore::new());
        config.seed(&store)?;

        // Fan-out subscribes before any command can run, so bridges see
        // every post-startup transition.
        let fanout = Fanout::start(&store, publishers);

        let reconciler = Arc::new(Reconciler::with_config(
            Arc::clone(&store),
            adapter,
            config.reconcile.engine_config(),
        ));
        let sweep = ReconcilerTask::start(Arc::clone(&reconciler), config.reconcile.interval());

        let dispatcher = CommandDispatcher::new(Arc::clone(&store));

        tracing::info!("zonecast system started");
        Ok(Self {
            store,
            dispatcher,
            reconciler,
            sweep: Some(sweep),
            fanout: Some(fanout),
        })
    }

    /// The shared topology store
    pub fn store(&self) -> &Arc<TopologyStore> {
        &self.store
    }

    // ========================================================================
    // Command ingress
    // ========================================================================

    /// Single dispatch entry point for all command source adapters
    pub async fn dispatch(&self, command: Command) -> zonecast_command::Result<CommandOutcome> {
        self.dispatcher.dispatch(command).await
    }

    // ========================================================================
    // Operator surface
    // ========================================================================

    /// Check zone cohesion without correcting anything
    ///
    /// Always returns a structured report; an unreachable external
    /// system yields `Unavailable`, never an error and never a split.
    pub async fn validate(&self) -> ValidationReport {
        match self.reconciler.validate().await {
            Ok(report) => ValidationReport::from_cohesion(report),
            Err(e) => {
                if e.is_transient() {
                    tracing::warn!(error = %e, "validation unavailable");
                } else {
                    tracing::error!(error = %e, "validation failed");
                }
                ValidationReport::unavailable()
            }
        }
    }

    /// Correct every split zone
    pub async fn reconcile(&self) -> ReconcileReport {
        match self.reconciler.reconcile().await {
            Ok(outcome) => ReconcileReport::from_outcome(outcome),
            Err(e) => {
                if e.is_transient() {
                    tracing::warn!(error = %e, "reconcile unavailable");
                } else {
                    tracing::error!(error = %e, "reconcile failed");
                }
                ReconcileReport::unavailable()
            }
        }
    }

    /// Converge a single zone, failing if it cannot be converged
    pub async fn synchronize_zone(&self, zone: ZoneId) -> Result<(), SystemError> {
        let outcome = self.reconciler.synchronize_zone(zone).await?;
        if outcome.is_converged() {
            Ok(())
        } else {
            Err(SystemError::Unconverged {
                zones: outcome.residual.iter().map(|s| s.zone).collect(),
            })
        }
    }

    /// Overall health and client count
    ///
    /// Health is recomputed from a fresh observation on every call,
    /// never cached. `Unknown` means the external system could not be
    /// observed - a transient condition, not a topology fault.
    pub async fn status(&self) -> SystemStatus {
        let health = match self.validate().await.status {
            ValidationStatus::Valid => GroupingHealth::Healthy,
            ValidationStatus::Invalid => GroupingHealth::Degraded,
            ValidationStatus::Unavailable => GroupingHealth::Unknown,
        };
        SystemStatus {
            health,
            total_clients: self.store.client_count(),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Stop the periodic sweep and the fan-out tasks
    pub async fn shutdown(mut self) -> Result<(), SystemError> {
        if let Some(sweep) = self.sweep.take() {
            sweep
                .shutdown()
                .await
                .map_err(|e| SystemError::Shutdown(e.to_string()))?;
        }
        if let Some(fanout) = self.fanout.take() {
            fanout
                .shutdown()
                .await
                .map_err(|e| SystemError::Shutdown(e.to_string()))?;
        }
        tracing::info!("zonecast system stopped");
        Ok(())
    }
}
