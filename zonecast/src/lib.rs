//! Zonecast - self-healing zone control for multi-room audio
//!
//! A multi-room installation partitions its playback endpoints
//! ("clients") into listening areas ("zones"), each zone driving one
//! audio group on an external multi-room audio server. That server's
//! actual grouping drifts - operators regroup by hand, the server
//! restarts, commands race - and zonecast heals the drift without
//! operator intervention.
//!
//! # Shape
//!
//! ```text
//! ingress adapters ──► CommandDispatcher ──► TopologyStore ──► Fanout ──► bridges
//!                                               ▲    │
//!                                    corrections│    │desired state
//!                                               │    ▼
//!                            Reconciler ◄──── GroupingAdapter (external server)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zonecast::{InstallationConfig, ZonecastSystem};
//!
//! let config = InstallationConfig::load("installation.toml")?;
//! let system = ZonecastSystem::start(config, adapter, vec![mqtt_bridge])?;
//!
//! // Operator surface
//! let report = system.validate().await;
//! let status = system.status().await;
//!
//! // Command ingress
//! use zonecast::command::{Command, CommandSource, ZoneOperation};
//! system
//!     .dispatch(Command::zone(zone_id, ZoneOperation::Play, CommandSource::Api))
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod system;

pub use config::{ClientConfig, InstallationConfig, ReconcileSettings, ZoneConfig};
pub use error::{ConfigError, SystemError};
pub use report::{
    ReconcileReport, ReconcileStatus, SystemStatus, ValidationReport, ValidationStatus,
};
pub use system::ZonecastSystem;

// Re-export the crates a typical embedder needs
pub use zonecast_command as command;
pub use zonecast_grouping as grouping;
pub use zonecast_notify as notify;
pub use zonecast_reconciler as reconciler;
pub use zonecast_state as state;
