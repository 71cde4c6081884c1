// src/pipeline/reminder.rs

//! Reminder windows ahead of a drop's start.
//!
//! Each window fires at most once per tracked drop, guarded by a flag on the
//! [`TrackedDrop`] that never goes back to `false`.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Priority, TrackedDrop};

/// A fixed lead time before a drop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderWindow {
    DayBefore,
    HalfHourBefore,
}

impl ReminderWindow {
    pub const ALL: [ReminderWindow; 2] = [ReminderWindow::DayBefore, ReminderWindow::HalfHourBefore];

    /// How far ahead of the start the window opens.
    pub fn lead(&self) -> Duration {
        match self {
            ReminderWindow::DayBefore => Duration::hours(24),
            ReminderWindow::HalfHourBefore => Duration::minutes(30),
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            ReminderWindow::DayBefore => Priority::High,
            ReminderWindow::HalfHourBefore => Priority::Urgent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReminderWindow::DayBefore => "24 hours",
            ReminderWindow::HalfHourBefore => "30 minutes",
        }
    }

    pub fn is_sent(&self, drop: &TrackedDrop) -> bool {
        match self {
            ReminderWindow::DayBefore => drop.reminded_24h,
            ReminderWindow::HalfHourBefore => drop.reminded_30m,
        }
    }

    pub fn mark_sent(&self, drop: &mut TrackedDrop) {
        match self {
            ReminderWindow::DayBefore => drop.reminded_24h = true,
            ReminderWindow::HalfHourBefore => drop.reminded_30m = true,
        }
    }
}

/// Windows that are open at `now` and not yet sent for this drop.
///
/// A drop without a start time, or one that has already started, has none.
pub fn due_windows(drop: &TrackedDrop, now: DateTime<Utc>) -> Vec<ReminderWindow> {
    let Some(start) = drop.start_time else {
        return Vec::new();
    };

    let time_left = start - now;
    if time_left <= Duration::zero() {
        return Vec::new();
    }

    ReminderWindow::ALL
        .into_iter()
        .filter(|w| time_left <= w.lead() && !w.is_sent(drop))
        .collect()
}
