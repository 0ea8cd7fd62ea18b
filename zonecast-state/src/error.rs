//! Error types for zonecast-state

use crate::model::{ClientId, ZoneId};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur during topology store operations
///
/// Zones and clients are fixed at startup, so an unknown index is an
/// invariant fault on the caller's side, fatal to that operation only.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No zone is configured at this index
    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    /// No client is configured at this index
    #[error("unknown client: {0}")]
    UnknownClient(ClientId),

    /// An internal lock was poisoned by a panicking writer
    #[error("internal state lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StateError::UnknownZone(ZoneId::new(9));
        assert_eq!(err.to_string(), "unknown zone: zone-9");
    }
}
