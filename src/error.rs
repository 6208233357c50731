//! Custom error types for the Waypost sync core
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Waypost sync operations
#[derive(Error, Debug)]
pub enum WaypostError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Local storage tier errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Archive container errors (not a ZIP, or a required member is missing)
    #[error("Archive format error: {0}")]
    Format(String),

    /// Archive member present but not valid JSON
    #[error("Archive parse error: {0}")]
    Parse(String),

    /// Decoded archive data lacks required metadata
    #[error("Archive validation error: {0}")]
    Validation(String),

    /// The chosen destination cannot run on this host
    #[error("Destination unavailable: {0}")]
    ProviderUnavailable(String),

    /// Placeholder integration point with no working implementation
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Remote endpoint or transport rejected an upload/download/sync
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl WaypostError {
    /// Create a "not found" error for local backup files
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for sync peers
    pub fn peer_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Peer",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error aborts an import before any state is touched
    pub fn is_import_rejection(&self) -> bool {
        matches!(
            self,
            Self::Format(_) | Self::Parse(_) | Self::Validation(_)
        )
    }

    /// Check if this is a transfer error (the only retryable kind)
    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for WaypostError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WaypostError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<zip::result::ZipError> for WaypostError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Format(err.to_string())
    }
}

/// Result type alias for Waypost sync operations
pub type WaypostResult<T> = Result<T, WaypostError>;
