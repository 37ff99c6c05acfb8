//! Runtime configuration
//!
//! Layers, lowest first: built-in defaults, the TOML config file,
//! environment variables, command-line flags. The merged result is validated
//! once and then passed by value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::constants::{duration, env};
use crate::core::view::LayoutMode;
use crate::error::ConfigError;
use crate::utils::config_paths::{expand_home, ConfigPaths};

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub refresh_interval_ms: Option<u64>,
    pub layout: Option<LayoutMode>,
    pub color: Option<bool>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl FileConfig {
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &content)
    }
}

/// Values given on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub refresh_interval_ms: Option<u64>,
    pub layout: Option<LayoutMode>,
    pub no_color: bool,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub refresh_interval: Duration,
    pub layout: LayoutMode,
    pub color: bool,
    /// `EnvFilter` directive; `None` defers to `RUST_LOG` and the default filter
    pub log_level: Option<String>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: duration::DEFAULT_REFRESH_INTERVAL,
            layout: LayoutMode::default(),
            color: true,
            log_level: None,
            log_file: ConfigPaths::new().log_file,
        }
    }
}

impl Config {
    /// Merge every layer using the process environment.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::load_with_env(overrides, |name| std::env::var(name).ok())
    }

    /// Merge every layer, reading environment variables through `lookup`.
    pub fn load_with_env<F>(overrides: &ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(file) = Self::read_config_file(overrides.config_path.as_deref())? {
            config.apply_file(file);
        }
        config.apply_env(lookup)?;
        config.apply_overrides(overrides);
        config.validate()?;

        debug!(
            interval_ms = config.refresh_interval.as_millis() as u64,
            layout = ?config.layout,
            color = config.color,
            "configuration loaded"
        );
        Ok(config)
    }

    /// An explicit path must exist; the default location is optional.
    fn read_config_file(explicit: Option<&Path>) -> Result<Option<FileConfig>, ConfigError> {
        if let Some(path) = explicit {
            return FileConfig::load(path).map(Some);
        }
        match ConfigPaths::new().config_file {
            Some(path) if path.is_file() => FileConfig::load(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(ms) = file.refresh_interval_ms {
            self.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(layout) = file.layout {
            self.layout = layout;
        }
        if let Some(color) = file.color {
            self.color = color;
        }
        if file.log_level.is_some() {
            self.log_level = file.log_level;
        }
        if let Some(log_file) = file.log_file {
            self.log_file = expand_home(&log_file);
        }
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env::INTERVAL_MS_ENV) {
            let ms = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv {
                    name: env::INTERVAL_MS_ENV,
                    value,
                })?;
            self.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(level) = lookup(env::LOG_ENV).filter(|level| !level.trim().is_empty()) {
            self.log_level = Some(level);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ms) = overrides.refresh_interval_ms {
            self.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(layout) = overrides.layout {
            self.layout = layout;
        }
        if overrides.no_color {
            self.color = false;
        }
        if overrides.log_level.is_some() {
            self.log_level.clone_from(&overrides.log_level);
        }
        if let Some(log_file) = &overrides.log_file {
            self.log_file.clone_from(log_file);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ms = self.refresh_interval.as_millis();
        if ms < u128::from(duration::MIN_REFRESH_INTERVAL_MS)
            || ms > u128::from(duration::MAX_REFRESH_INTERVAL_MS)
        {
            return Err(ConfigError::InvalidInterval {
                value_ms: u64::try_from(ms).unwrap_or(u64::MAX),
                min_ms: duration::MIN_REFRESH_INTERVAL_MS,
                max_ms: duration::MAX_REFRESH_INTERVAL_MS,
            });
        }
        Ok(())
    }
}
