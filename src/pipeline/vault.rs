// src/pipeline/vault.rs

//! Vault open/closed flip detection.

use crate::models::{Notification, Priority, Snapshot, VaultFact, VaultStatus};

/// Record the observed vault status, announcing genuine flips only.
///
/// The first observation is silent; the stored status is always overwritten.
pub fn detect_vault_change(fact: &VaultFact, snapshot: &mut Snapshot) -> Option<Notification> {
    let status = VaultStatus::from_disabled(fact.is_disabled);
    log::info!("Vault status: {}", status);

    let previous = snapshot.vault_status.replace(status);
    match previous {
        Some(prev) if prev != status => {
            log::info!("Vault changed {} -> {}", prev, status);
            Some(Notification::new(
                "Alienware Vault",
                format!("Alienware Vault Status Changed!\nNew Status: {}", status),
                Priority::Default,
            ))
        }
        _ => None,
    }
}
