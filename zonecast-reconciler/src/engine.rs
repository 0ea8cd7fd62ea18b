//! The reconciliation engine
//!
//! Compares desired zone membership against the external system's actual
//! grouping and issues corrective moves until they agree or the attempt
//! budget runs out. All observation happens on cloned store snapshots -
//! no store lock is ever held across adapter I/O - and every correction
//! is idempotent, so concurrent passes over the same zone converge to
//! the same result instead of thrashing.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use zonecast_grouping::{ExternalClientId, GroupId, GroupingAdapter, GroupingError, GroupingSnapshot};
use zonecast_state::{ClientId, ClientState, TopologyStore, ZoneId, ZoneState};

use crate::cohesion::{self, CohesionReport, SplitZone};
use crate::error::{ReconcileError, Result};
use crate::plan;

/// Tuning knobs for validation and correction passes
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Correction rounds per pass before reporting residual faults
    pub attempt_limit: usize,
    /// Deadline for each individual adapter call
    pub adapter_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            attempt_limit: 3,
            adapter_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of one correction pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Zones that received corrective moves during this pass
    pub corrected: Vec<ZoneId>,
    /// Zones still split after the attempt budget was exhausted
    pub residual: Vec<SplitZone>,
}

impl ReconcileOutcome {
    /// Whether the pass left every zone cohesive
    pub fn is_converged(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Keeps actual external grouping convergent with desired topology
pub struct Reconciler {
    store: Arc<TopologyStore>,
    adapter: Arc<dyn GroupingAdapter>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a reconciler with default tuning
    pub fn new(store: Arc<TopologyStore>, adapter: Arc<dyn GroupingAdapter>) -> Self {
        Self::with_config(store, adapter, ReconcilerConfig::default())
    }

    /// Create a reconciler with explicit tuning
    pub fn with_config(
        store: Arc<TopologyStore>,
        adapter: Arc<dyn GroupingAdapter>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            adapter,
            config,
        }
    }

    // ========================================================================
    // Validation (read-only)
    // ========================================================================

    /// Check every zone against a fresh snapshot without correcting
    ///
    /// Pure observation: callers can ask "is it broken?" without
    /// triggering a fix. An unreachable external system surfaces as a
    /// transient [`ReconcileError`], never as a split report.
    pub async fn validate(&self) -> Result<CohesionReport> {
        let snapshot = self.observe().await?;
        Ok(cohesion::check(
            &self.store.zones(),
            &self.store.clients(),
            &snapshot,
        ))
    }

    // ========================================================================
    // Correction
    // ========================================================================

    /// Converge every zone
    pub async fn reconcile(&self) -> Result<ReconcileOutcome> {
        self.converge(None).await
    }

    /// Converge a single zone
    pub async fn synchronize_zone(&self, zone: ZoneId) -> Result<ReconcileOutcome> {
        if self.store.zone(&zone).is_none() {
            return Err(ReconcileError::UnknownZone(zone));
        }
        self.converge(Some(zone)).await
    }

    async fn converge(&self, scope: Option<ZoneId>) -> Result<ReconcileOutcome> {
        let mut corrected: BTreeSet<ZoneId> = BTreeSet::new();

        for round in 1..=self.config.attempt_limit {
            let snapshot = self.observe().await?;
            let zones = self.scoped_zones(scope);
            let clients = self.store.clients();

            let report = cohesion::check(&zones, &clients, &snapshot);
            if report.is_cohesive() {
                return Ok(ReconcileOutcome {
                    corrected: corrected.into_iter().collect(),
                    residual: Vec::new(),
                });
            }

            tracing::debug!(round, splits = report.splits.len(), "correcting split zones");
            for split in &report.splits {
                // One zone's failure must not abort the rest of the sweep.
                match self
                    .correct_zone(split.zone, &zones[&split.zone], &clients, &snapshot)
                    .await
                {
                    Ok(moved) => {
                        if moved {
                            corrected.insert(split.zone);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(zone = %split.zone, error = %e, "zone correction failed");
                    }
                }
            }
        }

        // Attempt budget exhausted: observe once more and report what is
        // still split instead of looping further.
        let snapshot = self.observe().await?;
        let zones = self.scoped_zones(scope);
        let clients = self.store.clients();
        let report = cohesion::check(&zones, &clients, &snapshot);

        if !report.is_cohesive() {
            tracing::warn!(
                zones = ?report.split_zone_ids(),
                "residual splits after {} correction rounds",
                self.config.attempt_limit
            );
        }
        Ok(ReconcileOutcome {
            corrected: corrected.into_iter().collect(),
            residual: report.splits,
        })
    }

    /// Apply the correction plan for one zone
    ///
    /// Returns whether any move was issued. Clients already in the
    /// target group are recognized by the planner and never reach the
    /// adapter.
    async fn correct_zone(
        &self,
        id: ZoneId,
        zone: &ZoneState,
        clients: &HashMap<ClientId, ClientState>,
        snapshot: &GroupingSnapshot,
    ) -> Result<bool> {
        let Some(corrective) = plan::plan_zone(zone, clients, snapshot) else {
            return Ok(false);
        };

        tracing::info!(
            zone = %id,
            target = %corrective.target,
            moves = corrective.moves.len(),
            "converging zone onto group"
        );
        for mv in &corrective.moves {
            self.apply_move(&mv.external_id, &corrective.target).await?;
        }
        self.bind_group(id, &corrective.target)?;
        Ok(!corrective.is_empty())
    }

    /// Record the converged group on the zone itself
    ///
    /// The binding write goes through the store like any other change,
    /// so subscribers see the zone's group binding move.
    fn bind_group(&self, zone_id: ZoneId, target: &GroupId) -> Result<()> {
        let Some(mut zone) = self.store.zone(&zone_id) else {
            return Err(ReconcileError::UnknownZone(zone_id));
        };
        if &zone.group_id == target {
            return Ok(());
        }
        zone.group_id = target.clone();
        self.store.set_zone(&zone_id, zone)?;
        Ok(())
    }

    async fn observe(&self) -> Result<GroupingSnapshot> {
        match timeout(self.config.adapter_timeout, self.adapter.snapshot()).await {
            Ok(result) => result.map_err(ReconcileError::from),
            Err(_) => Err(ReconcileError::Adapter(GroupingError::Timeout)),
        }
    }

    async fn apply_move(&self, client: &ExternalClientId, group: &GroupId) -> Result<()> {
        match timeout(
            self.config.adapter_timeout,
            self.adapter.move_client(client, group),
        )
        .await
        {
            Ok(result) => result.map_err(ReconcileError::from),
            Err(_) => Err(ReconcileError::Adapter(GroupingError::Timeout)),
        }
    }

    fn scoped_zones(&self, scope: Option<ZoneId>) -> HashMap<ZoneId, ZoneState> {
        let mut zones = self.store.zones();
        if let Some(only) = scope {
            zones.retain(|id, _| *id == only);
        }
        zones
    }
}

// ============================================================================
// Tests
// ============================================================================
