//! Configuration for the Waypost sync core
//!
//! Path resolution and user settings.

pub mod paths;
pub mod settings;

pub use paths::WaypostPaths;
pub use settings::{RetrySettings, Settings};
