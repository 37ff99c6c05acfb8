//! Event loop core
//!
//! `App` owns the view state and turns queued [`AppEvent`]s into state
//! transitions and redraws. It never touches threads or the real terminal, so
//! it runs unchanged against ratatui's `TestBackend`.

use std::io;
use std::time::Duration;

use crossterm::event::Event;
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, trace};

use crate::core::models::Snapshot;
use crate::core::view::{Effect, LayoutMode, ViewEvent, ViewState, Viewport};
use crate::tui::components::theme::Theme;
use crate::tui::input::translate;
use crate::tui::render::render;

/// Everything the event loop can receive, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    /// The input reader stopped after a terminal error
    InputFailed(io::Error),
    Refresh(Snapshot),
}

pub struct App {
    state: ViewState,
    theme: Theme,
    interval: Duration,
}

impl App {
    pub fn new(viewport: Viewport, layout: LayoutMode, theme: Theme, interval: Duration) -> Self {
        Self {
            state: ViewState::new(viewport, layout),
            theme,
            interval,
        }
    }

    /// Feed one queued event into the state machine.
    ///
    /// Returns `Ok(None)` for terminal events the view has no meaning for;
    /// nothing changed, so the caller can skip redrawing.
    pub fn handle_event(&mut self, event: AppEvent) -> io::Result<Option<Effect>> {
        let view_event = match event {
            AppEvent::Input(input) => match translate(&input) {
                Some(view_event) => view_event,
                None => return Ok(None),
            },
            AppEvent::InputFailed(err) => return Err(err),
            AppEvent::Refresh(snapshot) => {
                trace!(processes = snapshot.len(), "merging snapshot");
                ViewEvent::Refresh(snapshot)
            }
        };

        let effect = self.state.handle(view_event);
        if effect == Effect::Quit {
            debug!("quit requested");
        }
        Ok(Some(effect))
    }

    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| render(frame, &self.state, &self.theme, self.interval))?;
        Ok(())
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }
}
