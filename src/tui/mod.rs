//! Interactive terminal view
//!
//! Wires the refresh scheduler and the input reader into a single event
//! channel and drives [`App`] from it on the calling thread.

use std::io::{stdout, Stdout};

use crossbeam::channel;
use crossterm::{
    execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info, warn};

pub mod app;
pub mod components;
pub mod input;
pub mod render;

use crate::config::Config;
use crate::core::scheduler::RefreshScheduler;
use crate::core::snapshot::SnapshotBuilder;
use crate::core::source::SystemFactSource;
use crate::core::view::{Effect, Viewport};
use crate::error::{MonitorError, MonitorResult};

pub use app::{App, AppEvent};
use components::theme::Theme;
use input::InputReader;

/// Raw mode plus alternate screen, restored on drop.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn enter() -> MonitorResult<Self> {
        enable_raw_mode().map_err(|err| MonitorError::terminal("enable raw mode", err))?;
        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, terminal::Clear(ClearType::All)) {
            let _ = disable_raw_mode();
            return Err(MonitorError::terminal("enter alternate screen", err));
        }

        let terminal = Terminal::new(CrosstermBackend::new(out))
            .map_err(|err| MonitorError::terminal("initialise terminal", err));
        match terminal {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore_terminal();
                Err(err)
            }
        }
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore_terminal();
    }
}

fn restore_terminal() {
    if let Err(err) = execute!(stdout(), LeaveAlternateScreen) {
        warn!(error = %err, "failed to leave alternate screen");
    }
    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "failed to disable raw mode");
    }
}

/// Run the live view until the user quits.
pub fn run(config: &Config) -> MonitorResult<()> {
    let (events_tx, events_rx) = channel::unbounded::<AppEvent>();

    let mut guard = TerminalGuard::enter()?;
    let size = guard
        .terminal()
        .size()
        .map_err(|err| MonitorError::terminal("read terminal size", err))?;

    let mut app = App::new(
        Viewport::new(size.width, size.height),
        config.layout,
        Theme::for_color(config.color),
        config.refresh_interval,
    );

    let refresh_tx = events_tx.clone();
    let mut scheduler = RefreshScheduler::spawn(
        SnapshotBuilder::new(SystemFactSource::new()),
        config.refresh_interval,
        move |snapshot| refresh_tx.send(AppEvent::Refresh(snapshot)).is_ok(),
    )
    .map_err(|source| MonitorError::Worker {
        worker: "refresh",
        source,
    })?;
    let input = InputReader::spawn(events_tx).map_err(|source| MonitorError::Worker {
        worker: "input",
        source,
    })?;

    info!(
        interval_ms = config.refresh_interval.as_millis() as u64,
        layout = ?config.layout,
        "live view started"
    );

    let result = event_loop(&mut app, &mut guard, &events_rx, &scheduler);

    input.shutdown();
    scheduler.shutdown();
    drop(guard);
    debug!("live view stopped");
    result
}

fn event_loop(
    app: &mut App,
    guard: &mut TerminalGuard,
    events: &channel::Receiver<AppEvent>,
    scheduler: &RefreshScheduler,
) -> MonitorResult<()> {
    let draw_err = |err| MonitorError::terminal("draw frame", err);
    app.draw(guard.terminal()).map_err(draw_err)?;

    // Both producers hold a sender; recv fails only when both have exited
    while let Ok(event) = events.recv() {
        let effect = app
            .handle_event(event)
            .map_err(|err| MonitorError::terminal("read input", err))?;
        match effect {
            None => continue,
            Some(Effect::Quit) => return Ok(()),
            Some(Effect::ScheduleRefresh) => scheduler.schedule_next(),
            Some(Effect::None) => {}
        }
        app.draw(guard.terminal()).map_err(draw_err)?;
    }

    debug!("event sources closed");
    Ok(())
}
