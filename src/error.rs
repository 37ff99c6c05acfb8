//! Error types for pretty-processes
//!
//! Per-process read failures never surface here; they are absorbed by the
//! snapshot builder. These types cover everything that can stop the program.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for the monitor binary and library entry points.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Raw mode, alternate screen or drawing failed
    #[error("Terminal error: {message}")]
    Terminal {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    /// A background thread could not be started
    #[error("Failed to start {worker} thread")]
    Worker {
        worker: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Failed to enumerate processes: {0}")]
    Enumeration(String),

    #[error("Failed to serialize output")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write output")]
    Output(#[source] io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Refresh interval {value_ms}ms is outside {min_ms}..={max_ms}ms")]
    InvalidInterval { value_ms: u64, min_ms: u64, max_ms: u64 },

    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Terminal,
    Config,
    Logging,
    Worker,
    Process,
    Output,
}

impl ErrorCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ErrorCategory::Terminal => "Terminal",
            ErrorCategory::Config => "Configuration",
            ErrorCategory::Logging => "Logging",
            ErrorCategory::Worker => "Worker",
            ErrorCategory::Process => "Process",
            ErrorCategory::Output => "Output",
        }
    }
}

impl MonitorError {
    pub fn terminal(message: impl Into<String>, source: io::Error) -> Self {
        MonitorError::Terminal {
            message: message.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::Terminal { .. } => ErrorCategory::Terminal,
            MonitorError::Config(_) => ErrorCategory::Config,
            MonitorError::Logging { .. } => ErrorCategory::Logging,
            MonitorError::Worker { .. } => ErrorCategory::Worker,
            MonitorError::Enumeration(_) => ErrorCategory::Process,
            MonitorError::Serialization(_) | MonitorError::Output(_) => ErrorCategory::Output,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            MonitorError::Terminal { message, source } => {
                format!("Terminal problem: {} ({})", message, source)
            }
            MonitorError::Config(err) => match err {
                ConfigError::FileRead { path, source } => {
                    format!("Cannot read config file {}: {}", path.display(), source)
                }
                other => format!("Configuration problem: {}", other),
            },
            MonitorError::Logging { message } => format!("Cannot set up logging: {}", message),
            MonitorError::Worker { worker, source } => {
                format!("Cannot start the {} thread: {}", worker, source)
            }
            MonitorError::Enumeration(reason) => {
                format!("Cannot read the process table: {}", reason)
            }
            MonitorError::Serialization(err) => format!("Cannot encode output: {}", err),
            MonitorError::Output(err) => format!("Cannot write output: {}", err),
        }
    }
}

/// Result type alias for convenience
pub type MonitorResult<T> = Result<T, MonitorError>;
