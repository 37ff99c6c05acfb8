//! Logging setup
//!
//! The interactive view owns the terminal, so it logs to a file; the one-shot
//! commands log to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::config_paths::ensure_parent_dir;

/// Used when neither a level nor `RUST_LOG` is given
pub const DEFAULT_LOG_FILTER: &str = "warn,pretty_processes=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Build the filter: explicit level first, then `RUST_LOG`, then the default.
pub fn build_filter(log_level: Option<&str>) -> Result<EnvFilter> {
    match log_level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log filter '{level}'"))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

/// Install the global subscriber.
///
/// # Examples
/// ```no_run
/// use pretty_processes::utils::logger::{init_logger, LogTarget};
///
/// init_logger(Some("debug"), LogTarget::Stderr).unwrap();
/// ```
pub fn init_logger(log_level: Option<&str>, target: LogTarget) -> Result<()> {
    let env_filter = build_filter(log_level)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match &target {
        LogTarget::File(log_path) => {
            ensure_parent_dir(log_path)
                .with_context(|| format!("cannot create log directory for {}", log_path.display()))?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .with_context(|| format!("cannot open log file {}", log_path.display()))?;

            let file_layer = fmt::layer()
                .with_writer(std::sync::Arc::new(file))
                .with_target(true)
                .with_thread_names(true)
                .with_ansi(false)
                .with_level(true);
            registry
                .with(file_layer)
                .try_init()
                .context("logger already initialised")?;
        }
        LogTarget::Stderr => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .compact();
            registry
                .with(stderr_layer)
                .try_init()
                .context("logger already initialised")?;
        }
    }

    tracing::debug!(?target, "logger initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn explicit_level_wins() {
        let filter = build_filter(Some("debug")).expect("valid filter");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn malformed_level_is_rejected() {
        assert!(build_filter(Some("pretty_processes=loud")).is_err());
    }

    #[test]
    #[serial]
    fn falls_back_to_the_default_filter() {
        let saved = std::env::var_os("RUST_LOG");
        std::env::remove_var("RUST_LOG");
        let filter = build_filter(None).expect("default filter");
        if let Some(value) = saved {
            std::env::set_var("RUST_LOG", value);
        }
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
