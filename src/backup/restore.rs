//! Destructive state restoration for the Waypost sync core
//!
//! Restoring replaces, never merges: every reserved-namespace key currently
//! in a tier is removed before the snapshot's keys are written, so nothing
//! from the prior state survives unless the snapshot also carries it.
//!
//! Individual key failures are logged and swallowed so one bad entry cannot
//! sink the rest of the restore; the report carries the failed keys.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, warn};

use crate::backup::snapshot::Snapshot;
use crate::error::WaypostResult;
use crate::storage::{KvTier, LocalStore};

/// Applies a snapshot over the local storage tiers
pub struct RestoreManager<'a> {
    store: &'a LocalStore,
}

impl<'a> RestoreManager<'a> {
    /// Create a new RestoreManager over the given store
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Replace both tiers with the snapshot's contents
    ///
    /// Fails outright only if a tier directory is unreachable; per-key
    /// failures are recorded in the report and skipped.
    pub fn replace(&self, snapshot: &Snapshot) -> WaypostResult<RestoreReport> {
        let mut report = RestoreReport::default();

        replace_tier(self.store.durable(), &snapshot.durable, &mut report)?;
        replace_tier(self.store.ephemeral(), &snapshot.ephemeral, &mut report)?;

        info!(
            removed = report.removed,
            written = report.written,
            failed = report.failed.len(),
            "Restore applied"
        );

        Ok(report)
    }
}

/// Clear one tier's reserved-namespace keys, then write the snapshot entries
fn replace_tier(
    tier: &KvTier,
    entries: &BTreeMap<String, Value>,
    report: &mut RestoreReport,
) -> WaypostResult<()> {
    for key in tier.keys()? {
        match tier.remove(&key) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                warn!(tier = tier.label(), key = %key, error = %e, "Failed to clear entry");
                report.failed.push(key);
            }
        }
    }

    for (key, value) in entries {
        match tier.write_value(key, value) {
            Ok(()) => report.written += 1,
            Err(e) => {
                warn!(tier = tier.label(), key = %key, error = %e, "Failed to restore entry");
                report.failed.push(key.clone());
            }
        }
    }

    Ok(())
}

/// Outcome of a restore
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Number of pre-existing keys removed across both tiers
    pub removed: usize,
    /// Number of snapshot keys written across both tiers
    pub written: usize,
    /// Keys that could not be cleared or written
    pub failed: Vec<String>,
}

impl RestoreReport {
    /// Check if every key was applied
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Get a summary of the restore
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!(
                "Restored {} entries ({} removed)",
                self.written, self.removed
            )
        } else {
            format!(
                "Restored {} entries ({} removed, {} failed: {})",
                self.written,
                self.removed,
                self.failed.len(),
                self.failed.join(", ")
            )
        }
    }
}
