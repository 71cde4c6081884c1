// src/pipeline/drops.rs

//! Drop tracking against the persisted snapshot.
//!
//! Every run the active candidates are reconciled with the tracked drops:
//!
//! - new active id: tracked with both reminder flags cleared and announced
//! - known active id: status refreshed, reminder windows evaluated
//! - tracked id no longer active: removed
//!
//! A removed id that shows up again later is treated as new.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::models::{DropCandidate, Notification, Priority, StatusCode, TrackedDrop};
use crate::utils::parse_start_time;

use super::reminder::due_windows;

/// Result of one reconciliation pass.
#[derive(Debug, Default)]
pub struct TrackOutcome {
    /// Notifications to dispatch, in candidate order
    pub notifications: Vec<Notification>,
    /// Ids tracked for the first time
    pub added: Vec<String>,
    /// Ids that were already tracked and are still active
    pub kept: Vec<String>,
    /// Ids dropped because they are no longer active
    pub expired: Vec<String>,
}

impl TrackOutcome {
    /// Number of drops active after this pass.
    pub fn active_count(&self) -> usize {
        self.added.len() + self.kept.len()
    }
}

/// Applies the drop transition rules with a fixed status allow-list.
#[derive(Debug, Clone)]
pub struct DropTracker {
    valid_statuses: Vec<StatusCode>,
}

impl DropTracker {
    pub fn new(valid_statuses: Vec<StatusCode>) -> Self {
        Self { valid_statuses }
    }

    /// Find the allow-listed status matching any of the candidate's status fields.
    pub fn classify(&self, candidate: &DropCandidate) -> Option<&StatusCode> {
        candidate
            .status_fields
            .iter()
            .flat_map(|raw| status_tokens(raw))
            .find_map(|token| self.valid_statuses.iter().find(|s| s.code == token))
    }

    fn label_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.valid_statuses
            .iter()
            .find(|s| s.code == code)
            .map_or(code, |s| s.label.as_str())
    }

    /// Reconcile `drops` with the current candidates at instant `now`.
    pub fn track(
        &self,
        candidates: &[DropCandidate],
        drops: &mut BTreeMap<String, TrackedDrop>,
        now: DateTime<Utc>,
    ) -> TrackOutcome {
        let mut outcome = TrackOutcome::default();
        let mut active: HashSet<&str> = HashSet::new();

        for candidate in candidates {
            let Some(status) = self.classify(candidate) else {
                continue;
            };
            if !active.insert(candidate.id.as_str()) {
                log::debug!("Ignoring repeated drop id {}", candidate.id);
                continue;
            }

            let start_time = candidate
                .start_date_field
                .as_deref()
                .and_then(parse_start_time);

            match drops.get_mut(&candidate.id) {
                None => {
                    log::info!("New active drop: {} [{}]", candidate.title, status.label);
                    drops.insert(
                        candidate.id.clone(),
                        TrackedDrop::new(&candidate.title, &status.code, start_time),
                    );
                    outcome
                        .notifications
                        .push(new_drop_notification(&candidate.title, &status.label, start_time));
                    outcome.added.push(candidate.id.clone());
                }
                Some(tracked) => {
                    if tracked.status != status.code {
                        log::info!(
                            "Drop {} status {} -> {}",
                            candidate.id,
                            self.label_for(&tracked.status),
                            status.label
                        );
                        tracked.status = status.code.clone();
                    }
                    tracked.title = candidate.title.clone();
                    if start_time.is_some() {
                        tracked.start_time = start_time;
                    }

                    for window in due_windows(tracked, now) {
                        window.mark_sent(tracked);
                        log::info!(
                            "Drop {} starts within {}; sending reminder",
                            candidate.id,
                            window.label()
                        );
                        outcome.notifications.push(Notification::new(
                            "Lenovo Drop Reminder",
                            format!(
                                "Starts within {}!\n{}",
                                window.label(),
                                tracked.title
                            ),
                            window.priority(),
                        ));
                    }
                    outcome.kept.push(candidate.id.clone());
                }
            }
        }

        drops.retain(|id, tracked| {
            let keep = active.contains(id.as_str());
            if !keep {
                log::info!("Drop no longer active: {} ({})", tracked.title, id);
                outcome.expired.push(id.clone());
            }
            keep
        });

        outcome
    }
}

/// Split a raw status field into candidate codes.
///
/// Values arrive JSON-encoded, e.g. `["code"]` or `"code"`.
fn status_tokens(raw: &str) -> Vec<String> {
    raw.chars()
        .filter(|c| !matches!(c, '"' | '[' | ']' | '\\'))
        .collect::<String>()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn new_drop_notification(
    title: &str,
    status_label: &str,
    start_time: Option<DateTime<Utc>>,
) -> Notification {
    let mut body = format!("New Lenovo Drop ({})!\n{}", status_label, title);
    if let Some(start) = start_time {
        body.push_str(&format!("\nStarts: {}", start.format("%Y-%m-%d %H:%M UTC")));
    }
    Notification::new("Lenovo Drop Alert", body, Priority::High)
}
