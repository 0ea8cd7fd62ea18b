//! Error types for zonecast-command

use zonecast_state::{ClientId, StateError, ZoneId};

/// Result type for command dispatch
pub type Result<T> = std::result::Result<T, CommandError>;

/// Errors surfaced by command validation and dispatch
///
/// Callers branch on the outcome without catching anything: validation
/// faults are rejected before mutation and never retried automatically,
/// while a deadline expiry is distinguishable so ingress adapters can
/// report a cancelled command differently from a rejected one.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The command names a zone index that is not configured
    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    /// The command names a client index that is not configured
    #[error("unknown client: {0}")]
    UnknownClient(ClientId),

    /// Volume outside 0..=100
    #[error("volume {0} out of range 0..=100")]
    InvalidVolume(u8),

    /// Relative volume step outside 1..=100
    #[error("volume step {0} out of range 1..=100")]
    InvalidStep(u8),

    /// Latency outside the accepted window
    #[error("latency {0} ms out of range -10000..=10000")]
    InvalidLatency(i32),

    /// The dispatch deadline expired before the mutation applied
    #[error("command deadline expired")]
    DeadlineExpired,

    /// The store rejected the write
    #[error("state store error: {0}")]
    State(#[from] StateError),
}

impl CommandError {
    /// Whether this is a structural validation fault (rejected before
    /// any mutation)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommandError::UnknownZone(_)
                | CommandError::UnknownClient(_)
                | CommandError::InvalidVolume(_)
                | CommandError::InvalidStep(_)
                | CommandError::InvalidLatency(_)
        )
    }
}
