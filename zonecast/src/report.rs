//! Operator-facing report types
//!
//! Everything the operator surface returns is a plain serializable
//! value: monitoring polls these without any exception handling, and the
//! out-of-scope transport layer encodes them directly.

use serde::Serialize;

use zonecast_reconciler::{CohesionReport, ReconcileOutcome, SplitZone};
use zonecast_state::{GroupingHealth, ZoneId};

/// Outcome class of a validation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Every zone is cohesive
    Valid,
    /// At least one zone is split
    Invalid,
    /// The external system could not be observed (transient)
    Unavailable,
}

/// Result of `validate()`
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Outcome class
    pub status: ValidationStatus,
    /// Zones found split, with the groups involved
    pub offending_zones: Vec<SplitZone>,
}

impl ValidationReport {
    /// Build from a cohesion check
    pub fn from_cohesion(report: CohesionReport) -> Self {
        let status = if report.is_cohesive() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        };
        Self {
            status,
            offending_zones: report.splits,
        }
    }

    /// The external system was unreachable
    pub fn unavailable() -> Self {
        Self {
            status: ValidationStatus::Unavailable,
            offending_zones: Vec::new(),
        }
    }
}

/// Outcome class of a correction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileStatus {
    /// Every zone ended the pass cohesive
    Converged,
    /// The attempt budget ran out with zones still split
    Residual,
    /// The external system could not be observed (transient)
    Unavailable,
}

/// Result of `reconcile()`
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// Outcome class
    pub status: ReconcileStatus,
    /// Zones that received corrective moves
    pub corrected_zones: Vec<ZoneId>,
    /// Zones still split after the pass
    pub residual_faults: Vec<SplitZone>,
}

impl ReconcileReport {
    /// Build from a correction pass outcome
    pub fn from_outcome(outcome: ReconcileOutcome) -> Self {
        let status = if outcome.is_converged() {
            ReconcileStatus::Converged
        } else {
            ReconcileStatus::Residual
        };
        Self {
            status,
            corrected_zones: outcome.corrected,
            residual_faults: outcome.residual,
        }
    }

    /// The external system was unreachable
    pub fn unavailable() -> Self {
        Self {
            status: ReconcileStatus::Unavailable,
            corrected_zones: Vec::new(),
            residual_faults: Vec::new(),
        }
    }
}

/// Result of `status()`
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    /// Overall grouping health, recomputed on each call
    pub health: GroupingHealth,
    /// Number of configured clients
    pub total_clients: usize,
}
