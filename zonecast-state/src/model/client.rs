//! Client state type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zonecast_grouping::ExternalClientId;

/// State of one physical playback endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    /// The client's identity on the external audio server
    pub external_id: ExternalClientId,
    /// Display name of the endpoint
    pub name: String,
    /// MAC address of the endpoint
    pub mac: String,
    /// Whether the endpoint is currently connected to the external server
    pub connected: bool,
    /// Client volume, 0..=100
    pub volume: u8,
    /// Whether the client is muted
    pub muted: bool,
    /// Playback latency compensation in milliseconds (may be negative)
    pub latency_ms: i32,
    /// When any field of this client last changed
    pub updated_at: DateTime<Utc>,
}

impl ClientState {
    /// Create a client with disconnected defaults
    pub fn new(
        external_id: ExternalClientId,
        name: impl Into<String>,
        mac: impl Into<String>,
    ) -> Self {
        Self {
            external_id,
            name: name.into(),
            mac: mac.into(),
            connected: false,
            volume: 0,
            muted: false,
            latency_ms: 0,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let c = ClientState::new(ExternalClientId::new("aa:bb:cc"), "Kitchen", "aa:bb:cc");
        assert!(!c.connected);
        assert_eq!(c.volume, 0);
        assert_eq!(c.latency_ms, 0);
        assert_eq!(c.external_id.as_str(), "aa:bb:cc");
    }
}
