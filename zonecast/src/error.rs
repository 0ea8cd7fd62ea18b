//! Error types for the zonecast facade

use zonecast_command::CommandError;
use zonecast_reconciler::ReconcileError;
use zonecast_state::{StateError, ZoneId};

/// Errors from configuration loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A zone references a client index that does not exist
    #[error("zone {zone} references unknown client {client}")]
    UnknownClientReference { zone: u32, client: u32 },

    /// A client is claimed by more than one zone
    #[error("client {client} is assigned to more than one zone")]
    DuplicateMembership { client: u32 },

    /// Seeding the store failed
    #[error("state store error: {0}")]
    State(#[from] StateError),
}

/// Errors surfaced by the system facade
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// Configuration problems at startup
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reconciliation failed
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Command dispatch failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Correction ran out of attempts with zones still split
    #[error("zones still split after correction: {zones:?}")]
    Unconverged { zones: Vec<ZoneId> },

    /// A background task failed to stop cleanly
    #[error("shutdown error: {0}")]
    Shutdown(String),
}
