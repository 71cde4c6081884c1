//! Snapshot persistence.
//!
//! The watcher keeps a single JSON document between runs:
//!
//! ```text
//! state.json
//! {
//!   "schema_version": 1,
//!   "giveaway_title": "...",
//!   "vault_status": "Open" | "Closed",
//!   "drops": { "<id>": { "title", "status", "start_time", "reminded_24h", "reminded_30m" } }
//! }
//! ```

pub mod local;
pub mod migrate;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStateStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the snapshot.
    ///
    /// Never fails: a missing, unreadable or malformed snapshot yields an
    /// empty one.
    async fn load(&self) -> Snapshot;

    /// Overwrite the persisted snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
