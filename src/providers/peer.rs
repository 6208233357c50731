//! Local-peer destination
//!
//! Selecting a nearby device as the destination does not move bytes at this
//! layer: the real transfer happens through the sync coordinator. The
//! provider's `upload` only mints a handoff token so the flow looks the same
//! as any other destination to the caller.

use tracing::debug;
use uuid::Uuid;

use crate::error::{WaypostError, WaypostResult};
use crate::providers::{DestinationProvider, ProviderDescriptor, RemoteEntry};

/// A nearby device reachable over the local network
pub struct LocalPeerProvider;

impl LocalPeerProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalPeerProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationProvider for LocalPeerProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: "local-peer",
            display_name: "Nearby Device",
            icon_glyph: "\u{1F4F1}",
            description: "Send this backup directly to a device on your network",
        }
    }

    fn is_available(&self) -> bool {
        true
    }

    fn upload(&self, file: &[u8], filename: &str) -> WaypostResult<String> {
        let token = format!("peer-{}", Uuid::new_v4());
        debug!(filename, bytes = file.len(), token = %token, "Staged archive for peer handoff");
        Ok(token)
    }

    fn download(&self, _remote_id: &str) -> WaypostResult<Vec<u8>> {
        Err(WaypostError::NotImplemented(
            "Peer archives are pushed during sync, not fetched back".to_string(),
        ))
    }

    fn list(&self) -> WaypostResult<Vec<RemoteEntry>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_available() {
        assert!(LocalPeerProvider::new().is_available());
    }

    #[test]
    fn test_upload_mints_unique_tokens() {
        let provider = LocalPeerProvider::new();

        let first = provider.upload(b"bytes", "backup.zip").unwrap();
        let second = provider.upload(b"bytes", "backup.zip").unwrap();

        assert!(first.starts_with("peer-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_list_is_empty() {
        assert!(LocalPeerProvider::new().list().unwrap().is_empty());
    }

    #[test]
    fn test_download_is_not_supported() {
        assert!(matches!(
            LocalPeerProvider::new().download("peer-x").unwrap_err(),
            WaypostError::NotImplemented(_)
        ));
    }
}
