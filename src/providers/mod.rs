//! Upload destinations for the Waypost sync core
//!
//! A destination provider is a pluggable backend capable of receiving and
//! returning backup archives. All variants sit behind one capability trait;
//! the registry constructs them fresh on every query and filters out the
//! ones that cannot run on this host, so callers never see an unusable
//! destination.

pub mod drive;
pub mod peer;
pub mod platform;

pub use drive::{DriveApiProvider, DriveClient};
pub use peer::LocalPeerProvider;
pub use platform::PlatformDriveProvider;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::WaypostResult;

/// Display information for one destination variant
///
/// Built fresh on every call; nothing here carries identity across queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Stable identifier used to select a destination
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Single glyph shown next to the name
    pub icon_glyph: &'static str,
    /// One-line description
    pub description: &'static str,
}

/// One remotely stored archive, as reported by a destination's listing
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    /// Remote identifier usable with `download`
    pub id: String,
    /// Stored filename
    pub name: String,
    /// When the archive was stored
    pub date: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
}

/// Capability interface over interchangeable upload destinations
pub trait DestinationProvider {
    /// Describe this destination for display
    fn descriptor(&self) -> ProviderDescriptor;

    /// Check whether this destination can run on this host right now
    fn is_available(&self) -> bool;

    /// Store an archive remotely, returning its remote identifier
    fn upload(&self, file: &[u8], filename: &str) -> WaypostResult<String>;

    /// Fetch a previously uploaded archive
    fn download(&self, remote_id: &str) -> WaypostResult<Vec<u8>>;

    /// List archives stored at this destination
    fn list(&self) -> WaypostResult<Vec<RemoteEntry>>;
}

/// Host capabilities, computed once at startup and injected
///
/// Keeping detection out of the providers makes availability deterministic
/// and testable without touching process-global state.
#[derive(Debug, Clone)]
pub struct PlatformCapabilities {
    /// Host operating system (`std::env::consts::OS`)
    pub host_os: &'static str,
    /// Whether the platform ships a first-party cloud drive
    pub platform_drive: bool,
}

impl PlatformCapabilities {
    /// Detect capabilities of the current host
    pub fn detect() -> Self {
        let host_os = std::env::consts::OS;
        Self {
            host_os,
            platform_drive: matches!(host_os, "macos" | "ios"),
        }
    }

    /// Build capabilities with an explicit platform-drive flag (tests)
    pub fn with_platform_drive(platform_drive: bool) -> Self {
        Self {
            host_os: std::env::consts::OS,
            platform_drive,
        }
    }
}

/// Constructs destination variants on demand
///
/// Availability can change at runtime (a client library loads, a platform
/// service appears), so listings are recomputed on every call and never
/// cached.
pub struct ProviderRegistry {
    capabilities: PlatformCapabilities,
    drive_client: Option<Arc<dyn DriveClient>>,
}

impl ProviderRegistry {
    /// Create a registry from the injected capabilities and optional drive
    /// client
    pub fn new(
        capabilities: PlatformCapabilities,
        drive_client: Option<Arc<dyn DriveClient>>,
    ) -> Self {
        Self {
            capabilities,
            drive_client,
        }
    }

    /// Construct every known variant, available or not
    pub fn all(&self) -> Vec<Box<dyn DestinationProvider>> {
        vec![
            Box::new(PlatformDriveProvider::new(&self.capabilities)),
            Box::new(DriveApiProvider::new(self.drive_client.clone())),
            Box::new(LocalPeerProvider::new()),
        ]
    }

    /// Construct the variants that can run on this host right now
    pub fn list_available(&self) -> Vec<Box<dyn DestinationProvider>> {
        self.all()
            .into_iter()
            .filter(|provider| provider.is_available())
            .collect()
    }

    /// Find an available destination by id
    pub fn find(&self, id: &str) -> Option<Box<dyn DestinationProvider>> {
        self.list_available()
            .into_iter()
            .find(|provider| provider.descriptor().id == id)
    }
}
