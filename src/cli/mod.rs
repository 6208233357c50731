//! CLI command handlers for the Waypost sync core
//!
//! Thin wrappers over the library's public API; all real behavior lives in
//! the core modules.

pub mod backup;
pub mod providers;

pub use backup::{handle_backup_command, BackupCommands};
pub use providers::handle_providers_command;
