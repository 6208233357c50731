//! File-backed key/value tier with atomic writes
//!
//! Each storage tier is a flat directory holding one `<key>.json` file per
//! entry. Writes go through a temp-file-then-rename sequence so a crash never
//! leaves a half-written value behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{WaypostError, WaypostResult};
use crate::storage::NAMESPACE_PREFIX;

/// One key/value storage tier backed by a directory of JSON files
#[derive(Debug, Clone)]
pub struct KvTier {
    dir: PathBuf,
    /// Short label used in log messages ("local" or "session")
    label: &'static str,
}

impl KvTier {
    /// Create a new tier rooted at the given directory
    pub fn new(dir: PathBuf, label: &'static str) -> Self {
        Self { dir, label }
    }

    /// Get the tier's root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the tier's log label
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// List every reserved-namespace key currently present in this tier
    ///
    /// Keys outside the reserved namespace (and non-JSON files) are ignored.
    /// Fails only if the tier directory itself cannot be read.
    pub fn keys(&self) -> WaypostResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            WaypostError::Storage(format!(
                "Failed to read {} tier directory {}: {}",
                self.label,
                self.dir.display(),
                e
            ))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                WaypostError::Storage(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if stem.starts_with(NAMESPACE_PREFIX) {
                        keys.push(stem.to_string());
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Check if a key is present in this tier
    pub fn contains(&self, key: &str) -> bool {
        file_for_key(&self.dir, key).map_or(false, |p| p.exists())
    }

    /// Read the raw stored text for a key
    pub fn read_raw(&self, key: &str) -> WaypostResult<String> {
        let path = file_for_key(&self.dir, key)?;
        fs::read_to_string(&path).map_err(|e| {
            WaypostError::Storage(format!("Failed to read {} key '{}': {}", self.label, key, e))
        })
    }

    /// Read and parse the JSON value stored under a key
    pub fn read_value(&self, key: &str) -> WaypostResult<Value> {
        let raw = self.read_raw(key)?;
        serde_json::from_str(&raw).map_err(|e| {
            WaypostError::Storage(format!(
                "Failed to parse {} key '{}': {}",
                self.label, key, e
            ))
        })
    }

    /// Write a JSON value under a key, atomically (write to temp, then rename)
    pub fn write_value(&self, key: &str, value: &Value) -> WaypostResult<()> {
        let path = file_for_key(&self.dir, key)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            WaypostError::Storage(format!(
                "Failed to create {} tier directory: {}",
                self.label, e
            ))
        })?;

        // Temp file in the same directory, required for the rename to be atomic
        let temp_path = path.with_extension("json.tmp");

        let file = File::create(&temp_path)
            .map_err(|e| WaypostError::Storage(format!("Failed to create temp file: {}", e)))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value)
            .map_err(|e| WaypostError::Storage(format!("Failed to serialize value: {}", e)))?;

        writer
            .flush()
            .map_err(|e| WaypostError::Storage(format!("Failed to flush value: {}", e)))?;

        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            WaypostError::Storage(format!("Failed to rename temp file: {}", e))
        })?;

        Ok(())
    }

    /// Remove a key from this tier
    ///
    /// Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> WaypostResult<()> {
        let path = file_for_key(&self.dir, key)?;
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| {
            WaypostError::Storage(format!(
                "Failed to remove {} key '{}': {}",
                self.label, key, e
            ))
        })
    }
}

/// Resolve the file path for a key, rejecting names that would escape the tier
fn file_for_key(dir: &Path, key: &str) -> WaypostResult<PathBuf> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
    {
        return Err(WaypostError::Storage(format!(
            "Invalid storage key: '{}'",
            key
        )));
    }
    Ok(dir.join(format!("{}.json", key)))
}
