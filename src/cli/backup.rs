//! Backup CLI commands
//!
//! Implements CLI commands for exporting, inspecting and importing backup
//! archives.

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::BackupManager;
use crate::config::paths::WaypostPaths;
use crate::config::settings::Settings;
use crate::device::DeviceIdentityStore;
use crate::error::{WaypostError, WaypostResult};
use crate::storage::LocalStore;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Export the local state into a backup archive
    Export {
        /// Directory to write the archive into (defaults to the backup
        /// directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List locally saved backup archives
    List {
        /// Show detailed information
        #[arg(long)]
        detailed: bool,
    },

    /// Import a backup archive, replacing ALL local state
    Import {
        /// Archive filename or path (use 'latest' for the most recent local
        /// backup)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a backup archive
    Info {
        /// Archive filename or path
        backup: String,
    },
}

/// Build the backup manager from the configured paths and settings
pub fn build_manager(paths: &WaypostPaths, settings: &Settings) -> WaypostResult<BackupManager> {
    let store = LocalStore::new(paths)?;
    let identity = DeviceIdentityStore::new(paths, settings.device_name.clone());
    Ok(BackupManager::new(store, identity, paths.backup_dir()))
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &WaypostPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> WaypostResult<()> {
    let manager = build_manager(paths, settings)?;

    match cmd {
        BackupCommands::Export { output } => {
            let path = match output {
                Some(dir) => {
                    let export = manager.export_snapshot()?;
                    std::fs::create_dir_all(&dir).map_err(|e| {
                        WaypostError::Io(format!("Failed to create output directory: {}", e))
                    })?;
                    let path = dir.join(&export.filename);
                    std::fs::write(&path, &export.bytes).map_err(|e| {
                        WaypostError::Io(format!("Failed to write backup file: {}", e))
                    })?;
                    path
                }
                None => manager.save_locally()?,
            };

            println!("Backup created: {}", path.display());
        }

        BackupCommands::List { detailed } => {
            let backups = manager.list_local_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: waypost export");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                if detailed {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Path: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_on,
                        format_size(backup.size_bytes),
                        backup.path.display(),
                    );
                } else {
                    println!(
                        "  {}. {} ({}, {})",
                        i + 1,
                        backup.filename,
                        backup.created_on,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Import { backup, force } => {
            let backup_path = resolve_backup_path(&manager, paths, &backup)?;
            let bytes = std::fs::read(&backup_path)
                .map_err(|e| WaypostError::Io(format!("Failed to read backup file: {}", e)))?;

            // Preview before anything destructive happens
            let info = manager.archive_info(&bytes)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", backup_path.display());
            println!("Exported: {}", info.export_date);
            println!("Device: {}", info.device_name);
            println!("Format version: {}", info.version);
            println!("Size: {}", format_size(info.file_size));
            println!();

            if !force {
                println!("WARNING: Importing will replace ALL current Waypost data!");
                println!("To proceed, run again with --force flag:");
                println!("  waypost import {} --force", backup);
                return Ok(());
            }

            // Keep an escape hatch: export the current state first
            println!("Saving a backup of the current data before import...");
            let safety = manager.save_locally()?;
            println!("Pre-import backup saved: {}", safety.display());
            println!();

            println!("Importing...");
            let report = manager.import_archive(&bytes)?;

            println!("Import complete!");
            println!("{}", report.restore.summary());
        }

        BackupCommands::Info { backup } => {
            let backup_path = resolve_backup_path(&manager, paths, &backup)?;
            let bytes = std::fs::read(&backup_path)
                .map_err(|e| WaypostError::Io(format!("Failed to read backup file: {}", e)))?;

            let info = manager.archive_info(&bytes)?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", backup_path.display());
            println!("Exported: {}", info.export_date);
            println!("Device: {}", info.device_name);
            println!("Format version: {}", info.version);
            println!("Contents: {}", info.data_types.join(", "));
            println!("Size: {}", format_size(info.file_size));
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(
    manager: &BackupManager,
    paths: &WaypostPaths,
    backup: &str,
) -> WaypostResult<PathBuf> {
    // Handle "latest" keyword
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_local_backup()?
            .map(|b| b.path)
            .ok_or_else(|| WaypostError::backup_not_found("latest"));
    }

    // Check if it's a full path
    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    // Check if it's a filename in the backup directory
    let backup_path = paths.backup_dir().join(backup);
    if backup_path.exists() {
        return Ok(backup_path);
    }

    // Try the conventional extension
    let with_ext = paths.backup_dir().join(format!("{}.zip", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(WaypostError::backup_not_found(backup))
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_resolve_backup_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings::default();
        let manager = build_manager(&paths, &settings).unwrap();

        // Nothing saved yet
        let err = resolve_backup_path(&manager, &paths, "latest").unwrap_err();
        assert!(err.is_not_found());

        let saved = manager.save_locally().unwrap();
        let filename = saved.file_name().unwrap().to_string_lossy().to_string();

        assert_eq!(resolve_backup_path(&manager, &paths, "latest").unwrap(), saved);
        assert_eq!(
            resolve_backup_path(&manager, &paths, &filename).unwrap(),
            saved
        );
        assert_eq!(
            resolve_backup_path(&manager, &paths, saved.to_str().unwrap()).unwrap(),
            saved
        );

        let err = resolve_backup_path(&manager, &paths, "missing.zip").unwrap_err();
        assert!(err.is_not_found());
    }
}
