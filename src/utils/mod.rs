//! Utility modules
//!
//! Formatting helpers, file locations and logging setup.

pub mod config_paths;
pub mod format;
pub mod logger;
