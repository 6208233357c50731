//! Waypost sync core - local-first backup, restore and multi-destination sync
//!
//! This library provides the backup, restore and sync core for the Waypost
//! trip-sharing application. It snapshots the locally persisted application
//! state into a portable, versioned ZIP archive, restores such an archive
//! destructively into a fresh environment, and abstracts interchangeable
//! upload destinations behind one capability interface.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `storage`: The two local key/value tiers (durable and ephemeral)
//! - `device`: Stable per-installation device identity
//! - `backup`: Snapshot collection, archive codec, restore, orchestration
//! - `providers`: Pluggable upload destinations and their registry
//! - `sync`: Peer sync boundary and retry policy
//! - `cli`: Command handlers for the `waypost` binary
//!
//! # Example
//!
//! ```rust,no_run
//! use waypost::backup::BackupManager;
//! use waypost::config::{paths::WaypostPaths, settings::Settings};
//! use waypost::device::DeviceIdentityStore;
//! use waypost::storage::LocalStore;
//!
//! # fn main() -> waypost::error::WaypostResult<()> {
//! let paths = WaypostPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//!
//! let store = LocalStore::new(&paths)?;
//! let identity = DeviceIdentityStore::new(&paths, settings.device_name.clone());
//! let manager = BackupManager::new(store, identity, paths.backup_dir());
//!
//! let archive = manager.export_snapshot()?;
//! println!("{} ({} bytes)", archive.filename, archive.bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod providers;
pub mod storage;
pub mod sync;

pub use error::{WaypostError, WaypostResult};
