//! Command pipeline for zonecast
//!
//! Accepts commands from any ingress (API, MQTT, KNX, internal),
//! validates them structurally before touching state, and applies
//! exactly one net mutation per command through the topology store.
//! Failures are typed values at the boundary - nothing panics across
//! it - and re-issuing a command whose desired state already holds is
//! a no-op success.
//!
//! ```rust,ignore
//! use zonecast_command::{Command, CommandDispatcher, CommandSource, ZoneOperation};
//!
//! let dispatcher = CommandDispatcher::new(store);
//! let outcome = dispatcher
//!     .dispatch(Command::zone(zone_id, ZoneOperation::SetVolume { volume: 35 }, CommandSource::Api))
//!     .await?;
//! ```

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod validate;

mod handlers;

pub use command::{
    ClientOperation, Command, CommandOutcome, CommandSource, CommandTarget, ZoneOperation,
};
pub use dispatcher::CommandDispatcher;
pub use error::{CommandError, Result};
