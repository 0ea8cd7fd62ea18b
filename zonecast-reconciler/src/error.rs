//! Error types for zonecast-reconciler

use zonecast_grouping::GroupingError;
use zonecast_state::{StateError, ZoneId};

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that can occur during validation or correction
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The grouping adapter failed; transient variants are retried on
    /// the next pass and never reported as topology faults
    #[error("grouping adapter error: {0}")]
    Adapter(#[from] GroupingError),

    /// The requested zone does not exist
    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    /// Writing a correction back to the store failed
    #[error("state store error: {0}")]
    State(#[from] StateError),

    /// The background sweep task failed to stop cleanly
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

impl ReconcileError {
    /// Whether this failure is transient (expected to clear on its own)
    pub fn is_transient(&self) -> bool {
        matches!(self, ReconcileError::Adapter(e) if e.is_transient())
    }
}
