//! Persisted watcher state.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::migrate::CURRENT_SCHEMA_VERSION;

/// The full state blob read at the start of a run and written at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version the snapshot was written with
    #[serde(default)]
    pub schema_version: u32,

    /// Last notified giveaway title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giveaway_title: Option<String>,

    /// Last observed vault status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_status: Option<VaultStatus>,

    /// Active drops keyed by their source identifier
    #[serde(default)]
    pub drops: BTreeMap<String, TrackedDrop>,

    /// Keys this version does not know about, kept round-trip
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            giveaway_title: None,
            vault_status: None,
            drops: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Open/closed state of the key vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultStatus {
    Open,
    Closed,
}

impl VaultStatus {
    /// A disabled product button means the vault is closed.
    pub fn from_disabled(is_disabled: bool) -> Self {
        if is_disabled {
            VaultStatus::Closed
        } else {
            VaultStatus::Open
        }
    }
}

impl fmt::Display for VaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultStatus::Open => f.write_str("Open"),
            VaultStatus::Closed => f.write_str("Closed"),
        }
    }
}

/// A drop seen while active, with its reminder bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedDrop {
    pub title: String,

    /// Last seen allow-listed status code
    pub status: String,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub reminded_24h: bool,

    #[serde(default)]
    pub reminded_30m: bool,
}

impl TrackedDrop {
    /// A freshly discovered drop with no reminders sent.
    pub fn new(
        title: impl Into<String>,
        status: impl Into<String>,
        start_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            start_time,
            reminded_24h: false,
            reminded_30m: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_status_from_disabled() {
        assert_eq!(VaultStatus::from_disabled(true), VaultStatus::Closed);
        assert_eq!(VaultStatus::from_disabled(false), VaultStatus::Open);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut snapshot = Snapshot::default();
        snapshot.vault_status = Some(VaultStatus::Open);
        snapshot.drops.insert(
            "A".to_string(),
            TrackedDrop::new("Free Game", "AmAI_EO502mWht5Fb6OE0", None),
        );

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["vault_status"], "Open");
        assert_eq!(value["drops"]["A"]["reminded_24h"], false);
        assert!(value.get("giveaway_title").is_none());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let raw = r#"{"schema_version":1,"drops":{},"custom_note":"keep me"}"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.extra["custom_note"], "keep me");

        let back = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(back["custom_note"], "keep me");
    }
}
