//! Notification fan-out for zonecast
//!
//! Delivers the topology store's change notifications to registered
//! outward publishers (MQTT bridges, KNX bridges, ...). Delivery is
//! asynchronous relative to the mutation that caused it: the command's
//! result returns to its caller without waiting for any bridge, and a
//! slow or failing bridge never blocks or fails a command.
//!
//! Ordering: each publisher sees notifications in the store's emission
//! order, so per-entity FIFO holds. Ordering across publishers is
//! unspecified.

pub mod fanout;
pub mod publisher;

pub use fanout::{Fanout, FanoutError};
pub use publisher::{OutwardPublisher, PublishError};
