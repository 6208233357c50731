//! Snapshot collection for the Waypost sync core
//!
//! A snapshot is the in-memory capture of every reserved-namespace entry in
//! both storage tiers at one instant. Collection is read-only and
//! best-effort: an entry whose stored text fails to parse as JSON is logged
//! and skipped rather than failing the whole export.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use crate::error::WaypostResult;
use crate::storage::{KvTier, LocalStore};

/// In-memory capture of both storage tiers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Reserved-namespace entries from the durable tier
    pub durable: BTreeMap<String, Value>,
    /// Reserved-namespace entries from the ephemeral tier
    pub ephemeral: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Total number of entries across both tiers
    pub fn len(&self) -> usize {
        self.durable.len() + self.ephemeral.len()
    }

    /// Check if the snapshot holds no entries
    pub fn is_empty(&self) -> bool {
        self.durable.is_empty() && self.ephemeral.is_empty()
    }
}

/// Collect a snapshot of both tiers
///
/// Fails only if a tier directory itself is unreachable; individual
/// unparseable entries are skipped.
pub fn collect_snapshot(store: &LocalStore) -> WaypostResult<Snapshot> {
    Ok(Snapshot {
        durable: collect_tier(store.durable())?,
        ephemeral: collect_tier(store.ephemeral())?,
    })
}

/// Read every reserved-namespace entry of one tier, skipping malformed values
fn collect_tier(tier: &KvTier) -> WaypostResult<BTreeMap<String, Value>> {
    let mut entries = BTreeMap::new();

    for key in tier.keys()? {
        let raw = match tier.read_raw(&key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(tier = tier.label(), key = %key, error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                entries.insert(key, value);
            }
            Err(e) => {
                warn!(tier = tier.label(), key = %key, error = %e, "Skipping unparseable entry");
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::WaypostPaths;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());
        (LocalStore::new(&paths).unwrap(), temp_dir)
    }

    #[test]
    fn test_collect_both_tiers() {
        let (store, _temp) = test_store();

        store
            .durable()
            .write_value("waypost_theme", &json!("dark"))
            .unwrap();
        store
            .durable()
            .write_value("waypost_lastTripId", &json!("trip_42"))
            .unwrap();
        store
            .ephemeral()
            .write_value("waypost_draftTitle", &json!("Paris"))
            .unwrap();

        let snapshot = collect_snapshot(&store).unwrap();

        assert_eq!(snapshot.durable.len(), 2);
        assert_eq!(snapshot.ephemeral.len(), 1);
        assert_eq!(snapshot.durable["waypost_theme"], json!("dark"));
        assert_eq!(snapshot.ephemeral["waypost_draftTitle"], json!("Paris"));
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_collect_empty_store() {
        let (store, _temp) = test_store();

        let snapshot = collect_snapshot(&store).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let (store, temp) = test_store();

        store
            .durable()
            .write_value("waypost_theme", &json!("dark"))
            .unwrap();
        std::fs::write(temp.path().join("local/waypost_broken.json"), "{oops").unwrap();

        let snapshot = collect_snapshot(&store).unwrap();

        assert_eq!(snapshot.durable.len(), 1);
        assert!(snapshot.durable.contains_key("waypost_theme"));
        assert!(!snapshot.durable.contains_key("waypost_broken"));
    }

    #[test]
    fn test_collect_ignores_foreign_keys() {
        let (store, temp) = test_store();

        std::fs::write(temp.path().join("local/other_app.json"), "true").unwrap();
        store
            .durable()
            .write_value("waypost_theme", &json!("light"))
            .unwrap();

        let snapshot = collect_snapshot(&store).unwrap();
        assert_eq!(snapshot.durable.len(), 1);
    }

    #[test]
    fn test_collect_is_read_only() {
        let (store, temp) = test_store();

        store
            .durable()
            .write_value("waypost_theme", &json!("dark"))
            .unwrap();
        std::fs::write(temp.path().join("local/waypost_bad.json"), "{oops").unwrap();

        collect_snapshot(&store).unwrap();

        // Malformed entry is still on disk, untouched
        let raw = store.durable().read_raw("waypost_bad").unwrap();
        assert_eq!(raw, "{oops");
    }
}
