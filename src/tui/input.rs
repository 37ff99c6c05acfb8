//! Terminal input
//!
//! A reader thread polls crossterm and forwards raw events to the event loop;
//! [`translate`] maps them onto the backend-independent [`ViewEvent`].

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use crossbeam::channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, warn};

use crate::common::constants::duration::INPUT_POLL_INTERVAL;
use crate::core::view::{KeyInput, ViewEvent};

use super::app::AppEvent;

/// Background thread forwarding terminal events.
pub struct InputReader {
    shutdown: Arc<AtomicBool>,
}

impl InputReader {
    pub fn spawn(events: Sender<AppEvent>) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let thread_shutdown = shutdown.clone();

        thread::Builder::new()
            .name("input-reader".into())
            .spawn(move || {
                while !thread_shutdown.load(Ordering::Relaxed) {
                    let next = match event::poll(INPUT_POLL_INTERVAL) {
                        Ok(true) => event::read().map(Some),
                        Ok(false) => Ok(None),
                        Err(err) => Err(err),
                    };
                    let sent = match next {
                        Ok(Some(event)) => events.send(AppEvent::Input(event)).is_ok(),
                        Ok(None) => true,
                        Err(err) => {
                            warn!(error = %err, "terminal input failed");
                            let _ = events.send(AppEvent::InputFailed(err));
                            false
                        }
                    };
                    if !sent {
                        break;
                    }
                }
                debug!("input reader exiting");
            })?;

        Ok(Self { shutdown })
    }

    /// Ask the reader to stop after its current poll. Does not wait.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Map a terminal event to a view event. Key releases, mouse and focus
/// events have no meaning for the view.
pub fn translate(event: &Event) -> Option<ViewEvent> {
    match event {
        Event::Key(key) => translate_key(key).map(ViewEvent::Key),
        Event::Resize(width, height) => Some(ViewEvent::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<KeyInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyInput::Interrupt),
            _ => None,
        };
    }

    let input = match key.code {
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Left => KeyInput::Left,
        KeyCode::Right => KeyInput::Right,
        KeyCode::PageUp => KeyInput::PageUp,
        KeyCode::PageDown => KeyInput::PageDown,
        KeyCode::Home => KeyInput::Home,
        KeyCode::End => KeyInput::End,
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Esc => KeyInput::Esc,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Char(c) if !c.is_control() => KeyInput::Char(c),
        _ => return None,
    };
    Some(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent, MouseEventKind};
    use test_case::test_case;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn key_input(event: Event) -> Option<KeyInput> {
        match translate(&event) {
            Some(ViewEvent::Key(input)) => Some(input),
            _ => None,
        }
    }

    #[test_case(KeyCode::Up, KeyInput::Up)]
    #[test_case(KeyCode::Down, KeyInput::Down)]
    #[test_case(KeyCode::Left, KeyInput::Left)]
    #[test_case(KeyCode::Right, KeyInput::Right)]
    #[test_case(KeyCode::PageUp, KeyInput::PageUp)]
    #[test_case(KeyCode::PageDown, KeyInput::PageDown)]
    #[test_case(KeyCode::Home, KeyInput::Home)]
    #[test_case(KeyCode::End, KeyInput::End)]
    #[test_case(KeyCode::Enter, KeyInput::Enter)]
    #[test_case(KeyCode::Esc, KeyInput::Esc)]
    #[test_case(KeyCode::Backspace, KeyInput::Backspace)]
    #[test_case(KeyCode::Char('/'), KeyInput::Char('/') ; "slash")]
    #[test_case(KeyCode::Char('G'), KeyInput::Char('G') ; "shifted letter")]
    fn maps_plain_keys(code: KeyCode, expected: KeyInput) {
        assert_eq!(key_input(key(code, KeyModifiers::NONE)), Some(expected));
    }

    #[test]
    fn shift_does_not_hide_characters() {
        assert_eq!(
            key_input(key(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('Q'))
        );
    }

    #[test_case('c', Some(KeyInput::Interrupt) ; "ctrl c interrupts")]
    #[test_case('a', None ; "other ctrl chords are ignored")]
    fn control_chords(c: char, expected: Option<KeyInput>) {
        assert_eq!(key_input(key(KeyCode::Char(c), KeyModifiers::CONTROL)), expected);
    }

    #[test]
    fn key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(translate(&release).is_none());
    }

    #[test]
    fn resize_carries_dimensions() {
        assert!(matches!(
            translate(&Event::Resize(120, 40)),
            Some(ViewEvent::Resize {
                width: 120,
                height: 40
            })
        ));
    }

    #[test]
    fn mouse_and_focus_events_are_dropped() {
        let mouse = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        });
        assert!(translate(&mouse).is_none());
        assert!(translate(&Event::FocusGained).is_none());
    }
}
