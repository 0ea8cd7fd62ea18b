//! Topology data model

mod client;
mod health;
mod ids;
mod media;
mod zone;

pub use client::ClientState;
pub use health::GroupingHealth;
pub use ids::{ClientId, ZoneId};
pub use media::{PlaylistRef, TrackRef};
pub use zone::ZoneState;
