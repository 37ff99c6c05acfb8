//! Pretty Processes Library
//!
//! Live terminal process monitor: periodic process-table snapshots merged into an
//! interactive, filterable view without losing the user's selection.

pub mod commands;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod tui;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use core::item::ProcessItem;
pub use core::models::{ProcessRecord, Snapshot};
pub use core::scheduler::{RefreshScheduler, SchedulerState};
pub use core::snapshot::SnapshotBuilder;
pub use core::source::{
    FactTable, Field, FieldError, ProcessFactSource, ProcessFacts, SourceError,
    StaticFactSource, SystemFactSource,
};
pub use core::view::{transition, Effect, KeyInput, LayoutMode, ViewEvent, ViewState, Viewport};
pub use error::{ConfigError, MonitorError, MonitorResult};
