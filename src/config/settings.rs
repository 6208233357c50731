//! User settings for the Waypost sync core
//!
//! Manages user preferences including the device display name and the retry
//! policy applied to destination and peer transfers.

use serde::{Deserialize, Serialize};

use super::paths::WaypostPaths;
use crate::error::WaypostError;

/// Retry policy for destination and peer transfer operations
///
/// Only transfer failures are retried; import and restore are never retried
/// internally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Initial delay between attempts, in milliseconds
    pub delay_ms: u64,
    /// Upper bound on the backoff delay, in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay_ms: 500,
            max_delay_ms: 5_000,
        }
    }
}

/// User settings for the Waypost sync core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Human-readable device name override
    ///
    /// When unset, a name is derived from the device id on first use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,

    /// Retry policy for transfer operations
    #[serde(default)]
    pub retry: RetrySettings,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            device_name: None,
            retry: RetrySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &WaypostPaths) -> Result<Self, WaypostError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| WaypostError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                WaypostError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Create default settings
            let settings = Settings::default();
            // Don't save yet - let caller decide when to persist
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WaypostPaths) -> Result<(), WaypostError> {
        // Ensure the config directory exists
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| WaypostError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| WaypostError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert!(settings.device_name.is_none());
        assert_eq!(settings.retry.max_retries, 2);
        assert_eq!(settings.retry.delay_ms, 500);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.device_name = Some("Kitchen Laptop".to_string());
        settings.retry.max_retries = 5;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.device_name.as_deref(), Some("Kitchen Laptop"));
        assert_eq!(loaded.retry.max_retries, 5);
    }

    #[test]
    fn test_load_missing_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaypostPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert!(settings.device_name.is_none());
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.schema_version, deserialized.schema_version);
        assert_eq!(settings.retry.delay_ms, deserialized.retry.delay_ms);
    }
}
