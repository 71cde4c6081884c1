// src/pipeline/monitor.rs

//! One watcher run: load, check every source, persist.

use std::fmt;

use crate::error::Result;
use crate::models::{Config, Notification, Snapshot};
use crate::services::{FactSource, Notifier};
use crate::storage::StateStore;
use crate::utils::Clock;

use super::drops::DropTracker;
use super::giveaway::detect_giveaway;
use super::vault::detect_vault_change;

/// How a single check ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The check ran and produced this many notifications
    Completed { notifications: usize },
    /// The source could not be read; its state was left untouched
    Failed { error: String },
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Completed { notifications } => {
                write!(f, "ok ({} notifications)", notifications)
            }
            CheckOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// Summary of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub giveaway: CheckOutcome,
    pub vault: CheckOutcome,
    pub drops: CheckOutcome,
    /// Notifications delivered (or skipped because no topic is set)
    pub sent: usize,
    /// Notifications the transport rejected
    pub failed: usize,
}

impl RunReport {
    pub fn failed_checks(&self) -> usize {
        [&self.giveaway, &self.vault, &self.drops]
            .into_iter()
            .filter(|c| matches!(c, CheckOutcome::Failed { .. }))
            .count()
    }

    /// Log the report as a summary block.
    pub fn log_summary(&self) {
        log::info!("Run summary:");
        log::info!("    Giveaway: {}", self.giveaway);
        log::info!("    Vault: {}", self.vault);
        log::info!("    Drops: {}", self.drops);
        log::info!("    Notifications: {} sent, {} failed", self.sent, self.failed);
    }
}

/// Runs the checks against one snapshot.
pub struct Monitor<'a> {
    tracker: DropTracker,
    source: &'a dyn FactSource,
    notifier: &'a dyn Notifier,
    clock: &'a dyn Clock,
}

impl<'a> Monitor<'a> {
    pub fn new(
        config: &Config,
        source: &'a dyn FactSource,
        notifier: &'a dyn Notifier,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            tracker: DropTracker::new(config.lenovo.valid_statuses.clone()),
            source,
            notifier,
            clock,
        }
    }

    /// Run every check in order, mutating `snapshot` in place.
    ///
    /// A failing check is logged and skipped; it never stops the others.
    pub async fn run(&self, snapshot: &mut Snapshot) -> RunReport {
        let mut sent = 0;
        let mut failed = 0;

        log::info!("Checking giveaway...");
        let giveaway = match self.source.giveaway().await {
            Ok(fact) => {
                log::info!(
                    "Found giveaway: {} (keys: {})",
                    fact.title.as_deref().unwrap_or("<none>"),
                    fact.key_count
                );
                let notifications: Vec<_> = detect_giveaway(&fact, snapshot).into_iter().collect();
                self.complete(notifications, &mut sent, &mut failed).await
            }
            Err(e) => Self::fail("giveaway", e),
        };

        log::info!("Checking vault...");
        let vault = match self.source.vault().await {
            Ok(fact) => {
                let notifications: Vec<_> =
                    detect_vault_change(&fact, snapshot).into_iter().collect();
                self.complete(notifications, &mut sent, &mut failed).await
            }
            Err(e) => Self::fail("vault", e),
        };

        log::info!("Checking drops...");
        let drops = match self.source.drops().await {
            Ok(candidates) => {
                let now = self.clock.now();
                let outcome = self.tracker.track(&candidates, &mut snapshot.drops, now);
                log::info!(
                    "Drop check done: {} candidates, {} active ({} new, {} expired)",
                    candidates.len(),
                    outcome.active_count(),
                    outcome.added.len(),
                    outcome.expired.len()
                );
                self.complete(outcome.notifications, &mut sent, &mut failed)
                    .await
            }
            Err(e) => Self::fail("drops", e),
        };

        RunReport {
            giveaway,
            vault,
            drops,
            sent,
            failed,
        }
    }

    /// Dispatch a check's notifications; delivery failures are only counted.
    async fn complete(
        &self,
        notifications: Vec<Notification>,
        sent: &mut usize,
        failed: &mut usize,
    ) -> CheckOutcome {
        let count = notifications.len();
        for notification in &notifications {
            match self.notifier.send(notification).await {
                Ok(()) => *sent += 1,
                Err(e) => {
                    *failed += 1;
                    log::warn!(
                        "Failed to send notification '{}': {}",
                        notification.title,
                        e
                    );
                }
            }
        }
        CheckOutcome::Completed {
            notifications: count,
        }
    }

    fn fail(check: &str, error: crate::error::AppError) -> CheckOutcome {
        log::error!("Error checking {}: {}", check, error);
        CheckOutcome::Failed {
            error: error.to_string(),
        }
    }
}

/// Load the snapshot, run all checks, and persist the result once.
pub async fn run_once(
    config: &Config,
    store: &dyn StateStore,
    source: &dyn FactSource,
    notifier: &dyn Notifier,
    clock: &dyn Clock,
) -> Result<RunReport> {
    let mut snapshot = store.load().await;
    let report = Monitor::new(config, source, notifier, clock)
        .run(&mut snapshot)
        .await;
    store.save(&snapshot).await?;
    Ok(report)
}
