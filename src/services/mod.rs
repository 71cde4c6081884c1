//! External collaborators of the watcher.
//!
//! This module contains:
//! - Fact extraction from the Alienware pages (`alienware`)
//! - The Lenovo drop feed (`lenovo`)
//! - The live HTTP fact source (`HttpFactSource`)
//! - Notification transports (`NtfyNotifier`, `LogNotifier`)

pub mod alienware;
pub mod lenovo;
mod notify;
mod source;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DropCandidate, GiveawayFact, VaultFact};

pub use notify::{LogNotifier, Notifier, NtfyNotifier};
pub use source::HttpFactSource;

/// Supplies typed facts to the detectors, one call per monitored source.
#[async_trait]
pub trait FactSource: Send + Sync {
    /// Current giveaway title and key count.
    async fn giveaway(&self) -> Result<GiveawayFact>;

    /// Current vault flag.
    async fn vault(&self) -> Result<VaultFact>;

    /// Drop candidates in feed order.
    async fn drops(&self) -> Result<Vec<DropCandidate>>;
}
