//! Peer sync boundary for the Waypost sync core
//!
//! The core does not implement discovery transport or a wire protocol. It
//! defines the two operations a sync coordinator must supply, exports the
//! archive, and hands it over, wrapping only the transfer step in the
//! bounded retry policy.

use std::time::Duration;

use tracing::{info, warn};

use crate::backup::manager::{BackupManager, ExportedArchive};
use crate::config::settings::RetrySettings;
use crate::error::WaypostResult;

/// A peer discovered on the local network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    /// Stable peer identifier
    pub id: String,
    /// Human-readable device name
    pub name: String,
    /// Network address the transport connects to
    pub address: String,
}

/// External interface to the peer discovery and transfer transport
pub trait SyncCoordinator {
    /// Discover nearby peers
    ///
    /// Best-effort: implementations return an empty list on failure rather
    /// than erroring.
    fn discover_peers(&self) -> Vec<PeerInfo>;

    /// Transfer an archive to a peer
    fn sync_with_peer(&self, peer_id: &str, archive: &[u8]) -> WaypostResult<()>;
}

/// Retry a transfer operation with bounded exponential backoff
///
/// Only [`WaypostError::Transfer`](crate::error::WaypostError::Transfer)
/// failures are retried; anything else propagates immediately.
pub fn retry_transfer<T>(
    retry: &RetrySettings,
    op_name: &str,
    f: impl Fn() -> WaypostResult<T>,
) -> WaypostResult<T> {
    let mut delay_ms = retry.delay_ms;
    let mut attempt = 0;

    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transfer() && attempt < retry.max_retries => {
                attempt += 1;
                warn!(
                    "{}: transfer failed (attempt {}/{}), retrying: {}",
                    op_name,
                    attempt,
                    retry.max_retries,
                    e
                );
                std::thread::sleep(Duration::from_millis(delay_ms));
                delay_ms = (delay_ms * 2).min(retry.max_delay_ms);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Core-side orchestration of peer sync
pub struct PeerSyncService<'a> {
    coordinator: &'a dyn SyncCoordinator,
    retry: RetrySettings,
}

impl<'a> PeerSyncService<'a> {
    /// Create a service around an externally supplied coordinator
    pub fn new(coordinator: &'a dyn SyncCoordinator, retry: RetrySettings) -> Self {
        Self { coordinator, retry }
    }

    /// Discover nearby peers
    pub fn discover_peers(&self) -> Vec<PeerInfo> {
        self.coordinator.discover_peers()
    }

    /// Export the local state and push the archive to a peer
    ///
    /// The export is read-only; only the transfer step can fail, so local
    /// state is unmodified when this errors.
    pub fn push_to_peer(
        &self,
        manager: &BackupManager,
        peer_id: &str,
    ) -> WaypostResult<ExportedArchive> {
        let export = manager.export_snapshot()?;

        retry_transfer(&self.retry, "peer sync", || {
            self.coordinator.sync_with_peer(peer_id, &export.bytes)
        })?;

        info!(peer_id, filename = %export.filename, "Synced archive to peer");
        Ok(export)
    }
}
