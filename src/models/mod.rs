// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod facts;
mod notification;
mod snapshot;

// Re-export all public types
pub use config::{
    AlienwareConfig, Config, HttpConfig, LenovoConfig, NtfyConfig, StateConfig, StatusCode,
};
pub use facts::{DropCandidate, GiveawayFact, VaultFact};
pub use notification::{Notification, Priority};
pub use snapshot::{Snapshot, TrackedDrop, VaultStatus};
