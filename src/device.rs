//! Device identity for the Waypost sync core
//!
//! Every installation gets a stable `(id, name)` pair that stamps exported
//! archives so a user can tell which device a backup came from. The identity
//! is generated lazily on first use and then never regenerated while the
//! identity file is present.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::paths::WaypostPaths;
use crate::error::{WaypostError, WaypostResult};

/// Stable identity of this installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Opaque stable identifier
    pub id: String,
    /// Human-readable device label
    pub name: String,
}

/// Loads, and on first use creates, the persistent device identity
///
/// Constructed once at startup and handed to the backup manager; the identity
/// file lives in the base directory, outside the reserved storage namespace,
/// so a destructive import never replaces it.
#[derive(Debug, Clone)]
pub struct DeviceIdentityStore {
    file: PathBuf,
    /// Preferred device name for a newly generated identity
    default_name: Option<String>,
}

impl DeviceIdentityStore {
    /// Create a new store for the configured identity file
    pub fn new(paths: &WaypostPaths, default_name: Option<String>) -> Self {
        Self {
            file: paths.device_file(),
            default_name,
        }
    }

    /// Get the path to the identity file
    pub fn file(&self) -> &PathBuf {
        &self.file
    }

    /// Load the persisted identity, generating and saving one if none exists
    ///
    /// Repeated calls return the same identity as long as the file is
    /// present.
    pub fn load_or_create(&self) -> WaypostResult<DeviceIdentity> {
        if self.file.exists() {
            self.load()
        } else {
            self.create()
        }
    }

    /// Load an existing identity from disk
    fn load(&self) -> WaypostResult<DeviceIdentity> {
        debug!(path = %self.file.display(), "Loading device identity");

        let contents = fs::read_to_string(&self.file)
            .map_err(|e| WaypostError::Io(format!("Failed to read device identity: {}", e)))?;

        let identity: DeviceIdentity = serde_json::from_str(&contents)
            .map_err(|e| WaypostError::Config(format!("Failed to parse device identity: {}", e)))?;

        Ok(identity)
    }

    /// Generate a new identity and persist it
    fn create(&self) -> WaypostResult<DeviceIdentity> {
        let id = Uuid::new_v4().to_string();
        let name = self
            .default_name
            .clone()
            .unwrap_or_else(|| format!("Waypost-{}", &id[..8]));

        let identity = DeviceIdentity { id, name };

        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WaypostError::Io(format!("Failed to create identity directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(&identity)
            .map_err(|e| WaypostError::Json(format!("Failed to serialize identity: {}", e)))?;

        fs::write(&self.file, contents)
            .map_err(|e| WaypostError::Io(format!("Failed to write device identity: {}", e)))?;

        info!(
            device_id = %identity.id,
            device_name = %identity.name,
            "Generated new device identity"
        );

        Ok(identity)
    }
}
