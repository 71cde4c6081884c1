//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{AppError, Result};
use crate::models::{DropCandidate, GiveawayFact, Notification, Priority, VaultFact};
use crate::services::{FactSource, Notifier};

/// Reference instant shifted by `hours`.
pub fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap() + Duration::hours(hours)
}

/// A candidate carrying the default "Active" status code.
pub fn active_candidate(id: &str, start: Option<DateTime<Utc>>) -> DropCandidate {
    DropCandidate {
        id: id.to_string(),
        title: format!("Drop {id}"),
        status_fields: vec!["[\"AmAI_EO502mWht5Fb6OE0\"]".to_string()],
        start_date_field: start.map(|s| s.to_rfc3339()),
    }
}

/// Fact source answering from canned values; unset sources fail.
#[derive(Default)]
pub struct FakeSource {
    giveaway: Option<GiveawayFact>,
    vault: Option<VaultFact>,
    drops: Option<Vec<DropCandidate>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_giveaway(mut self, title: Option<&str>, key_count: u64) -> Self {
        self.giveaway = Some(GiveawayFact {
            title: title.map(str::to_string),
            key_count,
        });
        self
    }

    pub fn with_vault(mut self, is_disabled: bool) -> Self {
        self.vault = Some(VaultFact { is_disabled });
        self
    }

    pub fn with_drops(mut self, drops: Vec<DropCandidate>) -> Self {
        self.drops = Some(drops);
        self
    }
}

#[async_trait]
impl FactSource for FakeSource {
    async fn giveaway(&self) -> Result<GiveawayFact> {
        self.giveaway
            .clone()
            .ok_or_else(|| AppError::extract("fake", "giveaway unavailable"))
    }

    async fn vault(&self) -> Result<VaultFact> {
        self.vault
            .ok_or_else(|| AppError::extract("fake", "vault unavailable"))
    }

    async fn drops(&self) -> Result<Vec<DropCandidate>> {
        self.drops
            .clone()
            .ok_or_else(|| AppError::extract("fake", "drops unavailable"))
    }
}

/// Records every notification it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    /// A notifier that records and then reports failure.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }

    pub fn priorities(&self) -> Vec<Priority> {
        self.notifications().into_iter().map(|n| n.priority).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(AppError::notify("transport down"));
        }
        Ok(())
    }
}
