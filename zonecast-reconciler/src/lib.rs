//! Grouping reconciliation for zonecast
//!
//! The external audio server's actual grouping drifts from the
//! installation's desired topology - operators regroup things by hand,
//! the server restarts, concurrent commands race. This crate closes the
//! loop: it detects divergence with the zone-cohesion rule and issues
//! the minimum set of corrective moves to converge.
//!
//! # Cohesion
//!
//! A zone is healthy when all of its desired members sit in one actual
//! group. The group may also contain other zones' clients (merged
//! "whole-house" listening); that is not a fault. Only a zone spread
//! over several groups - a *split* - gets corrected.
//!
//! # Pieces
//!
//! - [`cohesion`] - pure split detection, usable without side effects
//! - [`plan`] - pure correction planning (largest-subset target,
//!   lowest-ID tie-break)
//! - [`Reconciler`] - validate / reconcile / synchronize_zone against a
//!   [`GroupingAdapter`](zonecast_grouping::GroupingAdapter)
//! - [`ReconcilerTask`] - the periodic sweep

pub mod cohesion;
pub mod engine;
pub mod error;
pub mod plan;
pub mod task;

pub use cohesion::{CohesionReport, SplitZone};
pub use engine::{ReconcileOutcome, Reconciler, ReconcilerConfig};
pub use error::{ReconcileError, Result};
pub use plan::{CorrectionPlan, PlannedMove};
pub use task::ReconcilerTask;
