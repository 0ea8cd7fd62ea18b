//! External grouping system interface for zonecast
//!
//! This crate defines the vocabulary the rest of the workspace uses to
//! talk about the external multi-room audio server: identity types, the
//! point-in-time [`GroupingSnapshot`], and the [`GroupingAdapter`] trait
//! that wire-level clients implement. It deliberately contains no
//! business logic - which groupings are *healthy* is decided by the
//! reconciler, not here.
//!
//! With the `test-support` feature enabled, [`FakeGrouping`] provides an
//! in-memory server with fault injection for scenario tests.

pub mod adapter;
pub mod error;
pub mod ids;
pub mod snapshot;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use adapter::GroupingAdapter;
pub use error::{GroupingError, Result};
pub use ids::{ExternalClientId, GroupId, StreamId};
pub use snapshot::{GroupSnapshot, GroupingSnapshot};

#[cfg(any(test, feature = "test-support"))]
pub use testing::FakeGrouping;
