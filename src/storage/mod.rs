//! Local storage tiers for the Waypost sync core
//!
//! Waypost keeps its locally persisted application state in two key/value
//! tiers: a durable tier that survives restarts and an ephemeral tier the
//! application shell clears on startup. Both hold JSON values under keys in
//! the reserved `waypost_` namespace.

pub mod kv;

pub use kv::KvTier;

use crate::config::paths::WaypostPaths;
use crate::error::WaypostError;

/// Reserved key namespace owned by the sync core
///
/// Only keys with this prefix are snapshotted, exported, and replaced on
/// import.
pub const NAMESPACE_PREFIX: &str = "waypost_";

/// Both local storage tiers
#[derive(Debug, Clone)]
pub struct LocalStore {
    durable: KvTier,
    ephemeral: KvTier,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the configured paths
    pub fn new(paths: &WaypostPaths) -> Result<Self, WaypostError> {
        // Ensure tier directories exist
        paths.ensure_directories()?;

        Ok(Self {
            durable: KvTier::new(paths.local_dir(), "local"),
            ephemeral: KvTier::new(paths.session_dir(), "session"),
        })
    }

    /// Get the durable (cross-session) tier
    pub fn durable(&self) -> &KvTier {
        &self.durable
    }

    /// Get the ephemeral (session-scoped) tier
    pub fn ephemeral(&self) -> &KvTier {
        &self.ephemeral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LocalStore::new(&paths).unwrap();

        assert!(temp_dir.path().join("local").exists());
        assert!(temp_dir.path().join("session").exists());
        assert_eq!(store.durable().label(), "local");
        assert_eq!(store.ephemeral().label(), "session");
    }
}
