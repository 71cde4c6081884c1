// src/pipeline/giveaway.rs

//! Giveaway title change detection.

use crate::models::{GiveawayFact, Notification, Priority, Snapshot};

/// Compare the observed giveaway against the snapshot.
///
/// A non-empty title that differs from the stored one is recorded and
/// announced. A missing title leaves the snapshot alone.
pub fn detect_giveaway(fact: &GiveawayFact, snapshot: &mut Snapshot) -> Option<Notification> {
    let title = fact.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;

    if snapshot.giveaway_title.as_deref() == Some(title) {
        log::debug!("Giveaway unchanged: {}", title);
        return None;
    }

    log::info!("New giveaway: {} ({} keys)", title, fact.key_count);
    snapshot.giveaway_title = Some(title.to_string());

    Some(Notification::new(
        "Alienware Giveaway",
        format!(
            "New Alienware Giveaway!\nTitle: {}\nKeys: {}",
            title, fact.key_count
        ),
        Priority::Default,
    ))
}
