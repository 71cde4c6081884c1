//! Versioned snapshot schema upgrades.
//!
//! A raw snapshot object is upgraded one version at a time before it is
//! decoded into [`Snapshot`](crate::models::Snapshot). Files without a
//! `schema_version` key are version 0.

use serde_json::{Map, Value};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const VERSION_KEY: &str = "schema_version";

type Object = Map<String, Value>;

/// Upgrade step from version `n` to `n + 1`, indexed by `n`.
const MIGRATIONS: &[fn(&mut Object)] = &[v0_to_v1];

/// Read the schema version recorded in a raw snapshot.
pub fn schema_version(object: &Object) -> u32 {
    object
        .get(VERSION_KEY)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

/// Upgrade a raw snapshot in place to [`CURRENT_SCHEMA_VERSION`].
///
/// Returns the version the object had before upgrading. Objects written by a
/// newer build are left untouched.
pub fn upgrade(object: &mut Object) -> u32 {
    let found = schema_version(object);
    if found > CURRENT_SCHEMA_VERSION {
        log::warn!(
            "Snapshot schema v{} is newer than supported v{}; loading best-effort",
            found,
            CURRENT_SCHEMA_VERSION
        );
        return found;
    }

    for (version, step) in MIGRATIONS.iter().enumerate().skip(found as usize) {
        log::info!("Migrating snapshot schema v{} -> v{}", version, version + 1);
        step(object);
    }

    object.insert(VERSION_KEY.to_string(), Value::from(CURRENT_SCHEMA_VERSION));
    found
}

/// v0 kept a flat list of known drop ids and vendor-prefixed keys.
fn v0_to_v1(object: &mut Object) {
    if let Some(old) = object.remove("lenovo_known_ids") {
        let count = old.as_array().map_or(0, Vec::len);
        log::info!(
            "Dropped legacy lenovo_known_ids ({} ids); drops will be re-tracked",
            count
        );
    }

    for (old_key, new_key) in [
        ("alienware_giveaway_title", "giveaway_title"),
        ("alienware_vault_status", "vault_status"),
    ] {
        if let Some(value) = object.remove(old_key) {
            object.entry(new_key).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_unversioned_is_v0() {
        let raw = object(json!({ "giveaway_title": "x" }));
        assert_eq!(schema_version(&raw), 0);
    }

    #[test]
    fn test_v0_removes_known_ids() {
        let mut raw = object(json!({
            "lenovo_known_ids": ["a", "b"],
            "vault_status": "Open"
        }));

        let from = upgrade(&mut raw);

        assert_eq!(from, 0);
        assert!(!raw.contains_key("lenovo_known_ids"));
        assert_eq!(raw["vault_status"], "Open");
        assert_eq!(raw[VERSION_KEY], CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_v0_renames_vendor_keys() {
        let mut raw = object(json!({
            "alienware_giveaway_title": "Old Game",
            "alienware_vault_status": "Closed"
        }));

        upgrade(&mut raw);

        assert_eq!(raw["giveaway_title"], "Old Game");
        assert_eq!(raw["vault_status"], "Closed");
        assert!(!raw.contains_key("alienware_giveaway_title"));
    }

    #[test]
    fn test_rename_keeps_existing_new_key() {
        let mut raw = object(json!({
            "alienware_giveaway_title": "Older",
            "giveaway_title": "Newer"
        }));

        upgrade(&mut raw);

        assert_eq!(raw["giveaway_title"], "Newer");
    }

    #[test]
    fn test_current_version_untouched() {
        let mut raw = object(json!({
            "schema_version": CURRENT_SCHEMA_VERSION,
            "lenovo_known_ids": ["kept because already current"]
        }));

        upgrade(&mut raw);

        assert!(raw.contains_key("lenovo_known_ids"));
    }

    #[test]
    fn test_newer_version_left_alone() {
        let mut raw = object(json!({ "schema_version": 99 }));
        assert_eq!(upgrade(&mut raw), 99);
        assert_eq!(raw[VERSION_KEY], 99);
    }
}
