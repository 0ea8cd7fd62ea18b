//! Static installation configuration
//!
//! Zones and clients are fixed for the process lifetime: the set loaded
//! here at startup is the set the installation runs with until it exits.
//! Config is TOML; structural problems (dangling member references, a
//! client claimed by two zones) are rejected at load, before any state
//! exists.
//!
//! ```toml
//! [reconcile]
//! interval_secs = 30
//!
//! [[zones]]
//! name = "Ground Floor"
//! icon = "mdi:home"
//! stream = "radio"
//! clients = [1, 2]
//!
//! [[clients]]
//! name = "Living Room"
//! mac = "aa:bb:cc:dd:ee:01"
//! external_id = "living-room"
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use zonecast_grouping::{ExternalClientId, StreamId};
use zonecast_reconciler::ReconcilerConfig;
use zonecast_state::{ClientId, ClientState, TopologyStore, ZoneId, ZoneState};

use crate::error::ConfigError;

/// Reconciliation tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileSettings {
    /// Seconds between periodic sweeps
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Correction rounds per pass
    #[serde(default = "default_attempt_limit")]
    pub attempt_limit: usize,
    /// Deadline per adapter call, in seconds
    #[serde(default = "default_adapter_timeout_secs")]
    pub adapter_timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

fn default_attempt_limit() -> usize {
    3
}

fn default_adapter_timeout_secs() -> u64 {
    5
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            attempt_limit: default_attempt_limit(),
            adapter_timeout_secs: default_adapter_timeout_secs(),
        }
    }
}

impl ReconcileSettings {
    /// Sweep interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Engine tuning derived from these settings
    pub fn engine_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            attempt_limit: self.attempt_limit,
            adapter_timeout: Duration::from_secs(self.adapter_timeout_secs),
        }
    }
}

/// One configured zone
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneConfig {
    /// Display name
    pub name: String,
    /// Icon hint for user interfaces
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Stream this zone drives on the external system
    pub stream: String,
    /// 1-based indices of the zone's member clients
    #[serde(default)]
    pub clients: Vec<u32>,
}

fn default_icon() -> String {
    "mdi:speaker".to_string()
}

/// One configured playback client
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Display name
    pub name: String,
    /// MAC address of the endpoint
    pub mac: String,
    /// ID on the external audio server; defaults to the MAC
    #[serde(default)]
    pub external_id: Option<String>,
}

impl ClientConfig {
    /// The external ID, falling back to the MAC address
    pub fn external_id(&self) -> ExternalClientId {
        ExternalClientId::new(self.external_id.as_deref().unwrap_or(&self.mac))
    }
}

/// The full static installation description
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallationConfig {
    /// Reconciliation tuning
    #[serde(default)]
    pub reconcile: ReconcileSettings,
    /// Zones, in index order (the first entry is zone 1)
    pub zones: Vec<ZoneConfig>,
    /// Clients, in index order (the first entry is client 1)
    pub clients: Vec<ClientConfig>,
}

impl InstallationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: InstallationConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Check cross-references without touching any state
    pub fn validate(&self) -> Result<(), ConfigError> {
        let client_count = self.clients.len() as u32;
        let mut claimed: HashSet<u32> = HashSet::new();

        for (zone_index, zone) in self.zones.iter().enumerate() {
            let zone_id = zone_index as u32 + 1;
            for &client in &zone.clients {
                if client == 0 || client > client_count {
                    return Err(ConfigError::UnknownClientReference {
                        zone: zone_id,
                        client,
                    });
                }
                // A client belongs to at most one zone.
                if !claimed.insert(client) {
                    return Err(ConfigError::DuplicateMembership { client });
                }
            }
        }
        Ok(())
    }

    /// Populate a store with the configured entities
    ///
    /// Uses the store's idempotent initialization, so re-seeding an
    /// already-seeded store changes nothing.
    pub fn seed(&self, store: &TopologyStore) -> Result<(), ConfigError> {
        for (index, client) in self.clients.iter().enumerate() {
            let id = ClientId::new(index as u32 + 1);
            store.init_client(
                id,
                ClientState::new(client.external_id(), &client.name, &client.mac),
            )?;
        }
        for (index, zone) in self.zones.iter().enumerate() {
            let id = ZoneId::new(index as u32 + 1);
            let members = zone.clients.iter().copied().map(ClientId::new).collect();
            store.init_zone(
                id,
                ZoneState::new(&zone.name, &zone.icon, StreamId::new(&zone.stream), members),
            )?;
        }
        tracing::info!(
            zones = self.zones.len(),
            clients = self.clients.len(),
            "installation topology seeded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[zones]]
        name = "Ground Floor"
        icon = "mdi:home"
        stream = "radio"
        clients = [1, 2]

        [[zones]]
        name = "Bedroom"
        stream = "spotify"
        clients = [3]

        [[clients]]
        name = "Living Room"
        mac = "aa:bb:cc:dd:ee:01"
        external_id = "living-room"

        [[clients]]
        name = "Kitchen"
        mac = "aa:bb:cc:dd:ee:02"
        external_id = "kitchen"

        [[clients]]
        name = "Bedroom"
        mac = "aa:bb:cc:dd:ee:03"
    "#;

    #[test]
    fn test_parse_sample() {
        let config = InstallationConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.clients.len(), 3);
        assert_eq!(config.reconcile.interval_secs, 30);
        // Default icon applied
        assert_eq!(config.zones[1].icon, "mdi:speaker");
        // external_id falls back to the MAC
        assert_eq!(config.clients[2].external_id().as_str(), "aa:bb:cc:dd:ee:03");
    }

    #[test]
    fn test_dangling_member_rejected() {
        let bad = r#"
            [[zones]]
            name = "Zone"
            stream = "s"
            clients = [4]

            [[clients]]
            name = "Only"
            mac = "aa:bb:cc:dd:ee:01"
        "#;
        let err = InstallationConfig::from_toml_str(bad).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownClientReference { client: 4, .. }));
    }

    #[test]
    fn test_client_in_two_zones_rejected() {
        let bad = r#"
            [[zones]]
            name = "A"
            stream = "s"
            clients = [1]

            [[zones]]
            name = "B"
            stream = "s"
            clients = [1]

            [[clients]]
            name = "Shared"
            mac = "aa:bb:cc:dd:ee:01"
        "#;
        let err = InstallationConfig::from_toml_str(bad).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateMembership { client: 1 }));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let config = InstallationConfig::from_toml_str(SAMPLE).unwrap();
        let store = TopologyStore::new();

        config.seed(&store).unwrap();
        config.seed(&store).unwrap();

        assert_eq!(store.zone_count(), 2);
        assert_eq!(store.client_count(), 3);
        assert_eq!(
            store.zone(&ZoneId::new(1)).unwrap().members,
            vec![ClientId::new(1), ClientId::new(2)]
        );
    }

    #[test]
    fn test_reconcile_settings_override() {
        let input = r#"
            [reconcile]
            interval_secs = 10
            attempt_limit = 5

            [[zones]]
            name = "Zone"
            stream = "s"

            [[clients]]
            name = "C"
            mac = "aa:bb:cc:dd:ee:01"
        "#;
        let config = InstallationConfig::from_toml_str(input).unwrap();
        assert_eq!(config.reconcile.interval(), Duration::from_secs(10));
        assert_eq!(config.reconcile.engine_config().attempt_limit, 5);
        assert_eq!(
            config.reconcile.engine_config().adapter_timeout,
            Duration::from_secs(5)
        );
    }
}
