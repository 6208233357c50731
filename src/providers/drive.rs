//! Third-party drive API destination
//!
//! The drive SDK is loaded separately from this core and injected as a
//! [`DriveClient`] at startup. The provider is available exactly when a
//! client is present; every operation delegates to it.

use std::sync::Arc;

use crate::error::{WaypostError, WaypostResult};
use crate::providers::{DestinationProvider, ProviderDescriptor, RemoteEntry};

/// External boundary to the separately loaded drive client library
pub trait DriveClient: Send + Sync {
    /// Store a file, returning its remote identifier
    fn upload(&self, file: &[u8], filename: &str) -> WaypostResult<String>;

    /// Fetch a file by remote identifier
    fn download(&self, remote_id: &str) -> WaypostResult<Vec<u8>>;

    /// List stored files
    fn list(&self) -> WaypostResult<Vec<RemoteEntry>>;
}

/// Third-party drive destination delegating to an injected client
pub struct DriveApiProvider {
    client: Option<Arc<dyn DriveClient>>,
}

impl DriveApiProvider {
    /// Create the provider around an optionally present client
    pub fn new(client: Option<Arc<dyn DriveClient>>) -> Self {
        Self { client }
    }

    fn client(&self) -> WaypostResult<&Arc<dyn DriveClient>> {
        self.client.as_ref().ok_or_else(|| {
            WaypostError::ProviderUnavailable("Drive client library is not loaded".to_string())
        })
    }
}

impl DestinationProvider for DriveApiProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: "drive-api",
            display_name: "Drive",
            icon_glyph: "\u{1F5C4}",
            description: "Store backups in your connected drive account",
        }
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn upload(&self, file: &[u8], filename: &str) -> WaypostResult<String> {
        self.client()?.upload(file, filename)
    }

    fn download(&self, remote_id: &str) -> WaypostResult<Vec<u8>> {
        self.client()?.download(remote_id)
    }

    fn list(&self) -> WaypostResult<Vec<RemoteEntry>> {
        self.client()?.list()
    }
}
