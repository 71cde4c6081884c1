//! Typed facts handed from the extractors to the detectors.

use serde::{Deserialize, Serialize};

/// Current giveaway as shown on the giveaway page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiveawayFact {
    /// Widget title, `None` when the page had none
    pub title: Option<String>,

    /// Highest remaining key count across countries, 0 if unknown
    pub key_count: u64,
}

/// Vault availability as shown on the vault page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultFact {
    pub is_disabled: bool,
}

impl Default for VaultFact {
    /// An unreadable page counts as a disabled vault.
    fn default() -> Self {
        Self { is_disabled: true }
    }
}

/// One post from the drop feed, before status classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCandidate {
    pub id: String,
    pub title: String,

    /// Raw values of every status field on the post
    #[serde(default)]
    pub status_fields: Vec<String>,

    /// Raw start timestamp field, if the post had one
    #[serde(default)]
    pub start_date_field: Option<String>,
}
