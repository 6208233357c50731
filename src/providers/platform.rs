//! First-party platform drive destination
//!
//! A placeholder integration point: availability follows the host platform,
//! but the transfer operations are not wired up to the platform SDK yet and
//! fail with `NotImplemented`.

use crate::error::{WaypostError, WaypostResult};
use crate::providers::{
    DestinationProvider, PlatformCapabilities, ProviderDescriptor, RemoteEntry,
};

/// The platform's built-in cloud drive
pub struct PlatformDriveProvider {
    available: bool,
}

impl PlatformDriveProvider {
    /// Create the provider from the injected host capabilities
    pub fn new(capabilities: &PlatformCapabilities) -> Self {
        Self {
            available: capabilities.platform_drive,
        }
    }
}

impl DestinationProvider for PlatformDriveProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: "platform-drive",
            display_name: "Device Cloud Drive",
            icon_glyph: "\u{2601}",
            description: "The cloud drive built into this device's platform",
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn upload(&self, _file: &[u8], _filename: &str) -> WaypostResult<String> {
        Err(WaypostError::NotImplemented(
            "Platform drive upload is not wired up yet".to_string(),
        ))
    }

    fn download(&self, _remote_id: &str) -> WaypostResult<Vec<u8>> {
        Err(WaypostError::NotImplemented(
            "Platform drive download is not wired up yet".to_string(),
        ))
    }

    fn list(&self) -> WaypostResult<Vec<RemoteEntry>> {
        Err(WaypostError::NotImplemented(
            "Platform drive listing is not wired up yet".to_string(),
        ))
    }
}
