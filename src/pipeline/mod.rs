//! Change detection pipeline.
//!
//! - `detect_giveaway`: giveaway title changes
//! - `detect_vault_change`: vault open/closed flips
//! - `DropTracker`: drop lifecycle and reminder windows
//! - `Monitor` / `run_once`: one full run against the snapshot

pub mod drops;
pub mod giveaway;
pub mod monitor;
pub mod reminder;
pub mod vault;

pub use drops::{DropTracker, TrackOutcome};
pub use giveaway::detect_giveaway;
pub use monitor::{CheckOutcome, Monitor, RunReport, run_once};
pub use reminder::{ReminderWindow, due_windows};
pub use vault::detect_vault_change;
