//! Error types for the grouping adapter boundary

use crate::ids::{ExternalClientId, GroupId};

/// Errors surfaced by grouping adapter implementations
#[derive(Debug, thiserror::Error)]
pub enum GroupingError {
    /// The external audio server could not be reached
    #[error("external audio server unreachable: {0}")]
    Unreachable(String),

    /// A call to the external audio server timed out
    #[error("external audio server call timed out")]
    Timeout,

    /// The external system rejected a move because the client is unknown
    #[error("unknown client on external system: {0}")]
    UnknownClient(ExternalClientId),

    /// The external system rejected a move because the group is unknown
    #[error("unknown group on external system: {0}")]
    UnknownGroup(GroupId),

    /// The external system returned a malformed or unexpected response
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl GroupingError {
    /// Whether this failure is transient (retry on the next pass)
    ///
    /// Transient failures are reachability problems, indistinguishable
    /// from a network blip; they must never be escalated as topology
    /// faults.
    pub fn is_transient(&self) -> bool {
        matches!(self, GroupingError::Unreachable(_) | GroupingError::Timeout)
    }
}

/// Convenience alias for adapter results
pub type Result<T> = std::result::Result<T, GroupingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GroupingError::Unreachable("refused".into()).is_transient());
        assert!(GroupingError::Timeout.is_transient());
        assert!(!GroupingError::UnknownGroup(GroupId::new("g1")).is_transient());
        assert!(!GroupingError::Protocol("bad json".into()).is_transient());
    }
}
