//! Path management for the Waypost sync core
//!
//! Provides XDG-compliant path resolution for configuration, local state,
//! and backup archives.
//!
//! ## Path Resolution Order
//!
//! 1. `WAYPOST_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/waypost` or `~/.config/waypost`
//! 3. Windows: `%APPDATA%\waypost`

use std::path::PathBuf;

use crate::error::WaypostError;

/// Manages all paths used by the Waypost sync core
#[derive(Debug, Clone)]
pub struct WaypostPaths {
    /// Base directory for all Waypost data
    base_dir: PathBuf,
}

impl WaypostPaths {
    /// Create a new WaypostPaths instance
    ///
    /// Path resolution:
    /// 1. `WAYPOST_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/waypost` or `~/.config/waypost`
    /// 3. Windows: `%APPDATA%\waypost`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, WaypostError> {
        let base_dir = if let Ok(custom) = std::env::var("WAYPOST_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create WaypostPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/waypost/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the durable storage tier directory (~/.config/waypost/local/)
    ///
    /// Entries here persist across sessions.
    pub fn local_dir(&self) -> PathBuf {
        self.base_dir.join("local")
    }

    /// Get the ephemeral storage tier directory (~/.config/waypost/session/)
    ///
    /// The application shell clears this directory on startup; the sync core
    /// only reads and writes it.
    pub fn session_dir(&self) -> PathBuf {
        self.base_dir.join("session")
    }

    /// Get the backup directory (~/.config/waypost/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the device identity file
    pub fn device_file(&self) -> PathBuf {
        self.base_dir.join("device.json")
    }

    /// Ensure all required directories exist
    ///
    /// Creates:
    /// - Base directory (~/.config/waypost/)
    /// - Durable tier directory (~/.config/waypost/local/)
    /// - Ephemeral tier directory (~/.config/waypost/session/)
    /// - Backup directory (~/.config/waypost/backups/)
    pub fn ensure_directories(&self) -> Result<(), WaypostError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WaypostError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.local_dir())
            .map_err(|e| WaypostError::Io(format!("Failed to create local directory: {}", e)))?;

        std::fs::create_dir_all(self.session_dir())
            .map_err(|e| WaypostError::Io(format!("Failed to create session directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| WaypostError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if Waypost has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, WaypostError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("waypost"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, WaypostError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| WaypostError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("waypost"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.local_dir(), temp_dir.path().join("local"));
        assert_eq!(paths.session_dir(), temp_dir.path().join("session"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.local_dir().exists());
        assert!(paths.session_dir().exists());
        assert!(paths.backup_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.device_file(), temp_dir.path().join("device.json"));
    }

    #[test]
    fn test_not_initialized_without_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(!paths.is_initialized());
    }
}
