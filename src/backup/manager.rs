//! Backup orchestration for the Waypost sync core
//!
//! Ties the collector, codec and restorer together behind the entry points
//! the application shell calls: export, local save, import, and metadata
//! preview. Also owns the backup filename convention and the listing of
//! locally saved archives.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::backup::archive::{self, ArchiveMetadata, FORMAT_VERSION};
use crate::backup::restore::{RestoreManager, RestoreReport};
use crate::backup::snapshot::collect_snapshot;
use crate::device::DeviceIdentityStore;
use crate::error::{WaypostError, WaypostResult};
use crate::storage::LocalStore;

/// Product name used in backup filenames
pub const PRODUCT_NAME: &str = "waypost";

/// A freshly exported archive, ready to save or hand to a destination
#[derive(Debug, Clone)]
pub struct ExportedArchive {
    /// Conventional filename: `waypost-backup-<YYYY-MM-DD>.zip`
    pub filename: String,
    /// Archive bytes
    pub bytes: Vec<u8>,
}

/// Outcome of an import
#[derive(Debug)]
pub struct ImportReport {
    /// Metadata of the imported archive
    pub metadata: ArchiveMetadata,
    /// What the restore actually applied
    pub restore: RestoreReport,
}

/// A locally saved backup archive
#[derive(Debug, Clone)]
pub struct LocalBackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to the archive
    pub path: PathBuf,
    /// Export date parsed from the filename
    pub created_on: NaiveDate,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Orchestrates export, import and preview over the local store
pub struct BackupManager {
    store: LocalStore,
    identity: DeviceIdentityStore,
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Create a new BackupManager
    ///
    /// The identity store is resolved lazily: the device identity is
    /// generated on the first export that needs it.
    pub fn new(store: LocalStore, identity: DeviceIdentityStore, backup_dir: PathBuf) -> Self {
        Self {
            store,
            identity,
            backup_dir,
        }
    }

    /// Get the backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Snapshot the local state and encode it into an archive
    ///
    /// Read-only with respect to the storage tiers.
    pub fn export_snapshot(&self) -> WaypostResult<ExportedArchive> {
        let snapshot = collect_snapshot(&self.store)?;
        let identity = self.identity.load_or_create()?;
        let bytes = archive::encode_archive(&snapshot, &identity)?;

        let filename = format!(
            "{}-backup-{}.zip",
            PRODUCT_NAME,
            Utc::now().format("%Y-%m-%d")
        );

        info!(
            entries = snapshot.len(),
            bytes = bytes.len(),
            filename = %filename,
            "Exported snapshot"
        );

        Ok(ExportedArchive { filename, bytes })
    }

    /// Export and save the archive into the backup directory
    ///
    /// Returns the path of the written file. Mutates no tier state
    /// regardless of outcome.
    pub fn save_locally(&self) -> WaypostResult<PathBuf> {
        let export = self.export_snapshot()?;

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| WaypostError::Io(format!("Failed to create backup directory: {}", e)))?;

        let path = self.backup_dir.join(&export.filename);
        fs::write(&path, &export.bytes)
            .map_err(|e| WaypostError::Io(format!("Failed to write backup file: {}", e)))?;

        Ok(path)
    }

    /// Decode, validate and destructively apply an archive
    ///
    /// Format, parse and validation failures (including a version mismatch)
    /// surface before any call into the restorer, so the local state is
    /// untouched on those paths.
    pub fn import_archive(&self, bytes: &[u8]) -> WaypostResult<ImportReport> {
        let (metadata, snapshot) = archive::decode_archive(bytes)?;

        if metadata.version != FORMAT_VERSION {
            return Err(WaypostError::Validation(format!(
                "Unsupported archive version '{}' (this build reads '{}')",
                metadata.version, FORMAT_VERSION
            )));
        }

        let restore = RestoreManager::new(&self.store).replace(&snapshot)?;

        Ok(ImportReport { metadata, restore })
    }

    /// Get an archive's metadata without touching local state
    ///
    /// The returned `file_size` is the whole archive's byte length.
    pub fn archive_info(&self, bytes: &[u8]) -> WaypostResult<ArchiveMetadata> {
        archive::peek_metadata(bytes)
    }

    /// List locally saved backups, newest first
    pub fn list_local_backups(&self) -> WaypostResult<Vec<LocalBackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| WaypostError::Io(format!("Failed to read backup directory: {}", e)))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| WaypostError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "zip") {
                match parse_backup_info(&path) {
                    Some(info) => backups.push(info),
                    None => {
                        warn!(path = %path.display(), "Ignoring file with unrecognized name");
                    }
                }
            }
        }

        // Newest first
        backups.sort_by(|a, b| b.created_on.cmp(&a.created_on));

        Ok(backups)
    }

    /// Get the most recent locally saved backup
    pub fn latest_local_backup(&self) -> WaypostResult<Option<LocalBackupInfo>> {
        let backups = self.list_local_backups()?;
        Ok(backups.into_iter().next())
    }
}

/// Parse backup info from a `waypost-backup-<YYYY-MM-DD>.zip` path
fn parse_backup_info(path: &Path) -> Option<LocalBackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let date_part = filename
        .strip_prefix(&format!("{}-backup-", PRODUCT_NAME))?
        .strip_suffix(".zip")?;
    let created_on = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;

    let metadata = fs::metadata(path).ok()?;

    Some(LocalBackupInfo {
        filename,
        path: path.to_path_buf(),
        created_on,
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::archive::{DATA_MEMBER, METADATA_MEMBER};
    use crate::config::paths::WaypostPaths;
    use serde_json::json;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LocalStore::new(&paths).unwrap();
        let identity = DeviceIdentityStore::new(&paths, None);
        let manager = BackupManager::new(store, identity, paths.backup_dir());
        (manager, temp_dir)
    }

    fn seed_example_state(manager: &BackupManager) {
        manager
            .store
            .durable()
            .write_value("waypost_theme", &json!("dark"))
            .unwrap();
        manager
            .store
            .durable()
            .write_value("waypost_lastTripId", &json!("trip_42"))
            .unwrap();
        manager
            .store
            .ephemeral()
            .write_value("waypost_draftTitle", &json!("Paris"))
            .unwrap();
    }

    fn tier_state(manager: &BackupManager) -> (Vec<String>, Vec<String>) {
        (
            manager.store.durable().keys().unwrap(),
            manager.store.ephemeral().keys().unwrap(),
        )
    }

    fn build_zip(members: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in members {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_export_filename_convention() {
        let (manager, _temp) = test_manager();

        let export = manager.export_snapshot().unwrap();

        assert!(export.filename.starts_with("waypost-backup-"));
        assert!(export.filename.ends_with(".zip"));
        let date_part = export
            .filename
            .strip_prefix("waypost-backup-")
            .unwrap()
            .strip_suffix(".zip")
            .unwrap();
        assert!(NaiveDate::parse_from_str(date_part, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_export_import_round_trip() {
        let (source, _source_temp) = test_manager();
        seed_example_state(&source);

        let export = source.export_snapshot().unwrap();

        // Import into a fresh environment
        let (target, _target_temp) = test_manager();
        let report = target.import_archive(&export.bytes).unwrap();

        assert_eq!(report.restore.written, 3);
        assert!(report.restore.is_complete());

        // Exactly the exported entries, and no others
        let (durable, ephemeral) = tier_state(&target);
        assert_eq!(durable, vec!["waypost_lastTripId", "waypost_theme"]);
        assert_eq!(ephemeral, vec!["waypost_draftTitle"]);
        assert_eq!(
            target.store.durable().read_value("waypost_theme").unwrap(),
            json!("dark")
        );
        assert_eq!(
            target
                .store
                .durable()
                .read_value("waypost_lastTripId")
                .unwrap(),
            json!("trip_42")
        );
        assert_eq!(
            target
                .store
                .ephemeral()
                .read_value("waypost_draftTitle")
                .unwrap(),
            json!("Paris")
        );
    }

    #[test]
    fn test_import_replaces_existing_state() {
        let (source, _source_temp) = test_manager();
        seed_example_state(&source);
        let export = source.export_snapshot().unwrap();

        let (target, _target_temp) = test_manager();
        target
            .store
            .durable()
            .write_value("waypost_survivor", &json!("should not survive"))
            .unwrap();

        target.import_archive(&export.bytes).unwrap();

        assert!(!target.store.durable().contains("waypost_survivor"));
        assert!(target.store.durable().contains("waypost_theme"));
    }

    #[test]
    fn test_import_garbage_leaves_state_untouched() {
        let (manager, _temp) = test_manager();
        seed_example_state(&manager);
        let before = tier_state(&manager);

        let err = manager.import_archive(b"not an archive").unwrap_err();

        assert!(matches!(err, WaypostError::Format(_)));
        assert_eq!(tier_state(&manager), before);
        assert_eq!(
            manager.store.durable().read_value("waypost_theme").unwrap(),
            json!("dark")
        );
    }

    #[test]
    fn test_import_incomplete_container_leaves_state_untouched() {
        let (manager, _temp) = test_manager();
        seed_example_state(&manager);
        let before = tier_state(&manager);

        let bytes = build_zip(&[(METADATA_MEMBER, "{}")]);
        let err = manager.import_archive(&bytes).unwrap_err();

        assert!(matches!(err, WaypostError::Format(_)));
        assert_eq!(tier_state(&manager), before);
    }

    #[test]
    fn test_import_rejects_version_mismatch() {
        let (manager, _temp) = test_manager();
        seed_example_state(&manager);
        let before = tier_state(&manager);

        let metadata = r#"{"version":"0.9.0","exportDate":"2026-08-06T00:00:00Z","deviceName":"d","dataTypes":[],"fileSize":1}"#;
        let payload = r#"{"metadata":{"version":"0.9.0","timestamp":"2026-08-06T00:00:00Z","deviceId":"x","deviceName":"d"},"localData":{"waypost_theme":"light"}}"#;
        let bytes = build_zip(&[(METADATA_MEMBER, metadata), (DATA_MEMBER, payload)]);

        let err = manager.import_archive(&bytes).unwrap_err();

        assert!(matches!(err, WaypostError::Validation(_)));
        assert_eq!(tier_state(&manager), before);
        // The mismatched payload was never applied
        assert_eq!(
            manager.store.durable().read_value("waypost_theme").unwrap(),
            json!("dark")
        );
    }

    #[test]
    fn test_archive_info_is_read_only() {
        let (manager, _temp) = test_manager();
        seed_example_state(&manager);
        let export = manager.export_snapshot().unwrap();
        let before = tier_state(&manager);

        let info = manager.archive_info(&export.bytes).unwrap();

        assert_eq!(info.version, FORMAT_VERSION);
        assert_eq!(info.file_size, export.bytes.len() as u64);
        assert_eq!(tier_state(&manager), before);
    }

    #[test]
    fn test_save_locally() {
        let (manager, _temp) = test_manager();
        seed_example_state(&manager);
        let before = tier_state(&manager);

        let path = manager.save_locally().unwrap();

        assert!(path.exists());
        assert!(path.starts_with(manager.backup_dir()));
        assert_eq!(tier_state(&manager), before);

        // The saved file is a valid archive
        let bytes = fs::read(&path).unwrap();
        manager.archive_info(&bytes).unwrap();
    }

    #[test]
    fn test_list_local_backups() {
        let (manager, _temp) = test_manager();

        assert!(manager.list_local_backups().unwrap().is_empty());

        fs::create_dir_all(manager.backup_dir()).unwrap();
        fs::write(
            manager.backup_dir().join("waypost-backup-2026-08-01.zip"),
            b"x",
        )
        .unwrap();
        fs::write(
            manager.backup_dir().join("waypost-backup-2026-08-05.zip"),
            b"xx",
        )
        .unwrap();
        // Not a backup name, ignored
        fs::write(manager.backup_dir().join("notes.zip"), b"x").unwrap();

        let backups = manager.list_local_backups().unwrap();

        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].filename, "waypost-backup-2026-08-05.zip");
        assert_eq!(backups[1].filename, "waypost-backup-2026-08-01.zip");

        let latest = manager.latest_local_backup().unwrap().unwrap();
        assert_eq!(latest.filename, "waypost-backup-2026-08-05.zip");
        assert_eq!(latest.size_bytes, 2);
    }

    #[test]
    fn test_device_identity_is_stable_across_exports() {
        let (manager, _temp) = test_manager();

        let first = manager.export_snapshot().unwrap();
        let second = manager.export_snapshot().unwrap();

        let first_info = manager.archive_info(&first.bytes).unwrap();
        let second_info = manager.archive_info(&second.bytes).unwrap();
        assert_eq!(first_info.device_name, second_info.device_name);
    }
}
