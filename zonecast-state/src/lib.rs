//! Topology model and state store for zonecast
//!
//! Holds the canonical in-memory picture of the installation: which
//! zones exist, which clients they should contain, and the last observed
//! playback state of both. The [`TopologyStore`] detects field-level
//! deltas on every write and broadcasts one typed notification per
//! change, so downstream consumers (protocol bridges, the reconciler)
//! never have to diff state themselves.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use zonecast_state::{ClientId, ClientState, TopologyStore, ZoneId, ZoneState};
//!
//! let store = TopologyStore::new();
//! store.init_zone(ZoneId::new(1), zone_state)?;
//!
//! let mut rx = store.subscribe_changes();
//!
//! let mut zone = store.zone(&ZoneId::new(1)).unwrap();
//! zone.volume = 40;
//! store.set_zone(&ZoneId::new(1), zone)?;   // emits a Volume change
//!
//! let change = rx.try_recv()?;
//! assert_eq!(change.field_key(), "volume");
//! ```

pub mod error;
pub mod model;
pub mod notification;
pub mod store;

pub use error::{Result, StateError};
pub use model::{ClientId, ClientState, GroupingHealth, PlaylistRef, TrackRef, ZoneId, ZoneState};
pub use notification::{ChangeNotification, ClientChange, ZoneChange};
pub use store::TopologyStore;
