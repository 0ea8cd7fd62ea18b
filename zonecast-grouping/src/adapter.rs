//! The grouping adapter trait
//!
//! Implementations wrap the wire protocol of a concrete multi-room audio
//! server (JSON-RPC, HTTP, whatever the server speaks) and expose the two
//! operations reconciliation needs. All wire-format parsing stays behind
//! this trait; nothing else in the workspace sees raw responses.

use async_trait::async_trait;

use crate::error::Result;
use crate::ids::{ExternalClientId, GroupId};
use crate::snapshot::GroupingSnapshot;

/// Read and mutate actual group membership on the external audio server
///
/// Implementations must be safe to call concurrently: the periodic
/// reconciliation sweep, on-demand operator requests, and per-zone
/// corrections may all be in flight at once, possibly against different
/// groups.
#[async_trait]
pub trait GroupingAdapter: Send + Sync {
    /// Fetch the current grouping state
    ///
    /// The snapshot is a point-in-time observation and may be stale by
    /// the time the caller acts on it; reconciliation re-validates after
    /// applying corrections for exactly that reason.
    async fn snapshot(&self) -> Result<GroupingSnapshot>;

    /// Move a client into a group
    ///
    /// Moving a client already in the target group must succeed as a
    /// no-op on the external system, but callers are expected to skip
    /// such moves before issuing the call.
    async fn move_client(&self, client: &ExternalClientId, group: &GroupId) -> Result<()>;
}
