//! Outward publisher interface
//!
//! One publisher per external protocol bridge (MQTT, KNX, ...).
//! Publishers are registered at startup and never removed; from the
//! fan-out's perspective delivery is fire-and-forget.

use async_trait::async_trait;

use zonecast_state::ChangeNotification;

/// Errors a publisher may report for one delivery
///
/// Reported errors are logged by the fan-out and dropped; they never
/// reach the command that caused the change.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The bridge's transport failed
    #[error("transport error: {0}")]
    Transport(String),

    /// The notification cannot be represented on this protocol
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// A consumer of state change notifications
#[async_trait]
pub trait OutwardPublisher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Deliver one notification
    ///
    /// Called sequentially per publisher, in the store's emission order.
    /// Implementations should return promptly; a slow publisher delays
    /// only its own queue.
    async fn publish(&self, change: &ChangeNotification) -> Result<(), PublishError>;
}
