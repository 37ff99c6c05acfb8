//! Common constants used across the project

/// Application identity
pub mod app {
    /// Binary and directory name
    pub const NAME: &str = "pretty-processes";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Common file names and paths
pub mod files {
    /// User configuration file, looked up under the platform config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";
    /// Runtime directory name created under the temp directory
    pub const RUNTIME_DIR_NAME: &str = ".pretty-processes";
    pub const LOG_FILE_NAME: &str = "pretty-processes.log";
}

/// Environment variable names
pub mod env {
    pub const INTERVAL_MS_ENV: &str = "PRETTY_PROCESSES_INTERVAL_MS";
    pub const LOG_ENV: &str = "PRETTY_PROCESSES_LOG";
}

/// Time durations
pub mod duration {
    use std::time::Duration as StdDuration;

    /// Default refresh interval in milliseconds
    pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 3_000;
    pub const DEFAULT_REFRESH_INTERVAL: StdDuration =
        StdDuration::from_millis(DEFAULT_REFRESH_INTERVAL_MS);

    /// Accepted refresh interval bounds in milliseconds
    pub const MIN_REFRESH_INTERVAL_MS: u64 = 100;
    pub const MAX_REFRESH_INTERVAL_MS: u64 = 60 * 60 * 1_000;

    /// How long the input reader blocks before re-checking for shutdown
    pub const INPUT_POLL_INTERVAL: StdDuration = StdDuration::from_millis(250);

    /// CPU sampling window for the one-shot snapshot command
    pub const CPU_SAMPLE_WINDOW: StdDuration = StdDuration::from_millis(500);
}

/// Common UI messages
pub mod messages {
    pub const STATUS_WAITING: &str = "Waiting for the first snapshot...";
    pub const NO_MATCHES: &str = "No processes match the current filter.";
    pub const HELP_NORMAL: &str =
        "[↑/↓] Navigate  [←/→] Page  [/] Filter  [Esc] Clear filter  [t] Layout  [q] Quit";
    pub const HELP_FILTERING: &str = "[Enter] Apply filter  [Esc] Cancel  [↑/↓] Navigate";
}
