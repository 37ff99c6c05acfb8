//! Command-line interface definition
//!
//! Parsed with clap derive; everything here maps onto [`ConfigOverrides`].

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::core::view::LayoutMode;

/// Pretty Processes - live terminal process monitor
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pretty-processes",
    about = "Live, filterable process monitor for the terminal",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Refresh interval in milliseconds
    #[arg(long = "interval-ms", value_name = "MS", global = true)]
    pub interval_ms: Option<u64>,

    /// Initial layout
    #[arg(long, value_enum, global = true)]
    pub layout: Option<LayoutMode>,

    /// Disable colors
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Config file (default: <config dir>/pretty-processes/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `pretty_processes=trace`
    #[arg(long = "log-level", value_name = "FILTER", global = true)]
    pub log_level: Option<String>,

    /// Log file for the interactive view
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print one snapshot of the process table and exit
    Snapshot {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Only include processes whose pid, name or command line contains TEXT
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },
}

impl Cli {
    /// Parse arguments for tests or custom argv
    pub fn try_parse_args_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(iter)
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.options.config.clone(),
            refresh_interval_ms: self.options.interval_ms,
            layout: self.options.layout,
            no_color: self.options.no_color,
            log_level: self.options.log_level.clone(),
            log_file: self.options.log_file.clone(),
        }
    }
}
