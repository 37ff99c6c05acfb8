use std::process::ExitCode;

use clap::Parser;
use pretty_processes::commands::snapshot::{self, SnapshotOptions};
use pretty_processes::commands::{Cli, Commands};
use pretty_processes::config::Config;
use pretty_processes::error::{MonitorError, MonitorResult};
use pretty_processes::tui;
use pretty_processes::utils::logger::{init_logger, LogTarget};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match main_impl(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(
                category = err.category().display_name(),
                error = %err,
                "exiting with error"
            );
            eprintln!("{}", err.user_message());
            ExitCode::from(1)
        }
    }
}

fn main_impl(cli: Cli) -> MonitorResult<()> {
    let config = Config::load(&cli.overrides())?;

    match cli.command {
        Some(Commands::Snapshot { json, filter }) => {
            init_logging(&config, LogTarget::Stderr)?;
            snapshot::run(&SnapshotOptions { json, filter })
        }
        None => {
            init_logging(&config, LogTarget::File(config.log_file.clone()))?;
            tui::run(&config)
        }
    }
}

fn init_logging(config: &Config, target: LogTarget) -> MonitorResult<()> {
    init_logger(config.log_level.as_deref(), target).map_err(|err| MonitorError::Logging {
        message: format!("{err:#}"),
    })
}
