//! Config and runtime file locations
//!
//! - User configuration lives under the platform config directory
//!   (`~/.config/pretty-processes/` on Linux)
//! - Runtime data (logs) goes to `<temp>/.pretty-processes/`

use std::path::{Path, PathBuf};

use crate::common::constants::{app, files};

pub struct ConfigPaths {
    /// Persistent config directory, if the platform has one
    pub config_dir: Option<PathBuf>,
    pub runtime_dir: PathBuf,
    /// Default user config file
    pub config_file: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir().map(|dir| dir.join(app::NAME));
        let runtime_dir = std::env::temp_dir().join(files::RUNTIME_DIR_NAME);

        Self {
            config_file: config_dir
                .as_ref()
                .map(|dir| dir.join(files::CONFIG_FILE_NAME)),
            log_file: runtime_dir.join(files::LOG_FILE_NAME),
            config_dir,
            runtime_dir,
        }
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
