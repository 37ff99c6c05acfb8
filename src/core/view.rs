//! Live view state machine
//!
//! `ViewState` is owned by the event loop and changed only through
//! [`ViewState::handle`]. Keys, resizes and delivered snapshots go through the
//! same step, one at a time, so a refresh can never interleave with a
//! keystroke.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::item::ProcessItem;
use crate::core::models::Snapshot;

/// Layout used to render the item collection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Title line plus two detail lines per process
    #[default]
    List,
    /// One row per process under a header row
    Table,
}

impl LayoutMode {
    pub fn rows_per_item(self) -> usize {
        match self {
            LayoutMode::List => 3,
            LayoutMode::Table => 1,
        }
    }

    /// Rows taken by the header, footer and borders around the body.
    pub fn chrome_rows(self) -> usize {
        match self {
            LayoutMode::List => 7,
            LayoutMode::Table => 8,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::List => LayoutMode::Table,
            LayoutMode::Table => LayoutMode::List,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Keys the view understands, already decoupled from the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
    Char(char),
    /// Ctrl+C
    Interrupt,
}

#[derive(Debug, Clone)]
pub enum ViewEvent {
    Key(KeyInput),
    Resize { width: u16, height: u16 },
    Refresh(Snapshot),
}

/// What the event loop must do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Re-arm the refresh scheduler
    ScheduleRefresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    all_items: Vec<ProcessItem>,
    items: Vec<ProcessItem>,
    selected: Option<usize>,
    scroll_offset: usize,
    filter_text: String,
    filtering: bool,
    /// Pid selected when filter entry started
    filter_anchor: Option<u32>,
    viewport: Viewport,
    layout: LayoutMode,
    last_refresh: Option<DateTime<Utc>>,
    status: Option<String>,
    quit_requested: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Viewport::default(), LayoutMode::default())
    }
}

/// Pure form of [`ViewState::handle`].
pub fn transition(mut state: ViewState, event: ViewEvent) -> (ViewState, Effect) {
    let effect = state.handle(event);
    (state, effect)
}

impl ViewState {
    pub fn new(viewport: Viewport, layout: LayoutMode) -> Self {
        Self {
            all_items: Vec::new(),
            items: Vec::new(),
            selected: None,
            scroll_offset: 0,
            filter_text: String::new(),
            filtering: false,
            filter_anchor: None,
            viewport,
            layout,
            last_refresh: None,
            status: None,
            quit_requested: false,
        }
    }

    /// Apply one event. Once a quit has been requested every event is ignored.
    pub fn handle(&mut self, event: ViewEvent) -> Effect {
        if self.quit_requested {
            return Effect::None;
        }

        match event {
            ViewEvent::Key(key) => self.handle_key(key),
            ViewEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                self.ensure_visible();
                Effect::None
            }
            ViewEvent::Refresh(snapshot) => self.merge(snapshot),
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Effect {
        if key == KeyInput::Interrupt {
            return self.quit();
        }
        if let Some(motion) = Self::motion_for(key) {
            self.move_selection(motion);
            return Effect::None;
        }

        if self.filtering {
            match key {
                KeyInput::Char(c) => {
                    self.filter_text.push(c);
                    self.refilter();
                }
                KeyInput::Backspace => {
                    if self.filter_text.pop().is_some() {
                        self.refilter();
                    }
                }
                KeyInput::Enter => self.leave_filter_mode(),
                KeyInput::Esc => {
                    self.clear_filter();
                    self.leave_filter_mode();
                }
                _ => {}
            }
            return Effect::None;
        }

        match key {
            KeyInput::Char('q') => return self.quit(),
            KeyInput::Char('/') => self.enter_filter_mode(),
            KeyInput::Char('t') => {
                self.layout = self.layout.toggled();
                self.ensure_visible();
            }
            KeyInput::Char('j') => self.move_selection(Motion::Down),
            KeyInput::Char('k') => self.move_selection(Motion::Up),
            KeyInput::Char('h') => self.move_selection(Motion::PageUp),
            KeyInput::Char('l') => self.move_selection(Motion::PageDown),
            KeyInput::Char('g') => self.move_selection(Motion::Home),
            KeyInput::Char('G') => self.move_selection(Motion::End),
            KeyInput::Esc => self.clear_filter(),
            _ => {}
        }
        Effect::None
    }

    fn motion_for(key: KeyInput) -> Option<Motion> {
        match key {
            KeyInput::Up => Some(Motion::Up),
            KeyInput::Down => Some(Motion::Down),
            KeyInput::Left | KeyInput::PageUp => Some(Motion::PageUp),
            KeyInput::Right | KeyInput::PageDown => Some(Motion::PageDown),
            KeyInput::Home => Some(Motion::Home),
            KeyInput::End => Some(Motion::End),
            _ => None,
        }
    }

    fn quit(&mut self) -> Effect {
        self.quit_requested = true;
        Effect::Quit
    }

    fn merge(&mut self, snapshot: Snapshot) -> Effect {
        if let Some(reason) = snapshot.enumeration_error() {
            self.status = Some(reason.to_string());
            return Effect::ScheduleRefresh;
        }

        self.last_refresh = Some(snapshot.captured_at());
        self.status = None;
        self.all_items = snapshot.records().iter().map(ProcessItem::from).collect();
        self.refilter();
        Effect::ScheduleRefresh
    }

    fn enter_filter_mode(&mut self) {
        self.filtering = true;
        self.filter_anchor = self.selected_item().map(|item| item.pid);
    }

    /// Reselect the record that was selected before filtering, or the first
    /// visible one when the filter hides it.
    fn leave_filter_mode(&mut self) {
        self.filtering = false;
        if let Some(anchor) = self.filter_anchor.take() {
            self.selected = self
                .items
                .iter()
                .position(|item| item.pid == anchor)
                .or_else(|| (!self.items.is_empty()).then_some(0));
            self.ensure_visible();
        }
    }

    fn clear_filter(&mut self) {
        if !self.filter_text.is_empty() {
            self.filter_text.clear();
            self.refilter();
        }
    }

    /// Rebuild `items` from `all_items`, keeping the selected pid when it is
    /// still visible and falling back to the first item otherwise.
    fn refilter(&mut self) {
        let previous_pid = self.selected_item().map(|item| item.pid);
        let needle = self.filter_text.to_lowercase();

        self.items = self
            .all_items
            .iter()
            .filter(|item| item.matches(&needle))
            .cloned()
            .collect();

        self.selected = previous_pid
            .and_then(|pid| self.items.iter().position(|item| item.pid == pid))
            .or_else(|| (!self.items.is_empty()).then_some(0));
        self.ensure_visible();
    }

    fn move_selection(&mut self, motion: Motion) {
        let Some(current) = self.selected else {
            return;
        };
        let last = self.items.len().saturating_sub(1);
        let page = self.capacity();

        let next = match motion {
            Motion::Up => current.saturating_sub(1),
            Motion::Down => current.saturating_add(1).min(last),
            Motion::PageUp => current.saturating_sub(page),
            Motion::PageDown => current.saturating_add(page).min(last),
            Motion::Home => 0,
            Motion::End => last,
        };
        self.selected = Some(next);
        self.ensure_visible();
    }

    /// Scroll so the selection is inside the window, without leaving blank
    /// rows below the last item.
    fn ensure_visible(&mut self) {
        let Some(selected) = self.selected else {
            self.scroll_offset = 0;
            return;
        };
        let capacity = self.capacity();

        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + capacity {
            self.scroll_offset = selected + 1 - capacity;
        }
        let max_offset = self.items.len().saturating_sub(capacity);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Number of items that fit in the body for the current viewport and
    /// layout. Never zero.
    pub fn capacity(&self) -> usize {
        let body = usize::from(self.viewport.height).saturating_sub(self.layout.chrome_rows());
        (body / self.layout.rows_per_item()).max(1)
    }

    /// Items currently on screen.
    pub fn visible_window(&self) -> &[ProcessItem] {
        let start = self.scroll_offset.min(self.items.len());
        let end = start.saturating_add(self.capacity()).min(self.items.len());
        &self.items[start..end]
    }

    pub fn items(&self) -> &[ProcessItem] {
        &self.items
    }

    pub fn total_items(&self) -> usize {
        self.all_items.len()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ProcessItem> {
        self.selected.and_then(|index| self.items.get(index))
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Last enumeration failure, cleared by the next good snapshot.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::fixtures::record;
    use crate::core::models::ProcessRecord;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn snapshot(pids: &[u32]) -> Snapshot {
        Snapshot::new(pids.iter().map(|pid| record(*pid, &format!("proc{pid}"))).collect())
    }

    fn named(pid: u32, name: &str) -> ProcessRecord {
        record(pid, name)
    }

    fn refresh(state: &mut ViewState, pids: &[u32]) -> Effect {
        state.handle(ViewEvent::Refresh(snapshot(pids)))
    }

    fn press(state: &mut ViewState, key: KeyInput) -> Effect {
        state.handle(ViewEvent::Key(key))
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            press(state, KeyInput::Char(c));
        }
    }

    fn pids(state: &ViewState) -> Vec<u32> {
        state.items().iter().map(|item| item.pid).collect()
    }

    fn select_pid(state: &mut ViewState, pid: u32) {
        press(state, KeyInput::Home);
        while state.selected_item().map(|item| item.pid) != Some(pid) {
            let before = state.selected();
            press(state, KeyInput::Down);
            assert_ne!(before, state.selected(), "pid {pid} not reachable");
        }
    }

    #[test]
    fn initial_state_is_empty() {
        let state = ViewState::default();
        assert!(state.items().is_empty());
        assert_eq!(state.selected(), None);
        assert_eq!(state.filter_text(), "");
        assert!(!state.is_filtering());
        assert!(state.last_refresh().is_none());
    }

    #[test]
    fn first_refresh_selects_the_first_item() {
        let mut state = ViewState::default();
        assert_eq!(refresh(&mut state, &[1, 2, 3]), Effect::ScheduleRefresh);
        assert_eq!(pids(&state), vec![3, 2, 1]);
        assert_eq!(state.selected(), Some(0));
        assert!(state.last_refresh().is_some());
    }

    #[test]
    fn selection_follows_surviving_pid_to_its_new_index() {
        let mut state = ViewState::default();
        refresh(&mut state, &[10, 20, 30]);
        select_pid(&mut state, 20);
        assert_eq!(state.selected(), Some(1));

        refresh(&mut state, &[5, 20, 25, 40, 50]);
        assert_eq!(state.selected_item().map(|item| item.pid), Some(20));
        assert_eq!(state.selected(), Some(3));
    }

    #[test]
    fn selection_falls_back_to_first_item_when_pid_disappears() {
        let mut state = ViewState::default();
        refresh(&mut state, &[10, 20, 30]);
        select_pid(&mut state, 10);

        refresh(&mut state, &[20, 30]);
        assert_eq!(state.selected(), Some(0));

        refresh(&mut state, &[]);
        assert_eq!(state.selected(), None);
        assert_eq!(state.scroll_offset(), 0);
    }

    #[test]
    fn replacement_snapshot_end_to_end() {
        let mut state = ViewState::default();
        refresh(&mut state, &[50, 30]);
        select_pid(&mut state, 30);
        assert_eq!(state.selected(), Some(1));

        refresh(&mut state, &[60, 50]);
        assert_eq!(pids(&state), vec![60, 50]);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn filter_is_reapplied_to_fresh_data() {
        let mut state = ViewState::default();
        state.handle(ViewEvent::Refresh(Snapshot::new(vec![
            named(1, "bash"),
            named(2, "nginx"),
            named(3, "zsh"),
        ])));
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "SH");
        press(&mut state, KeyInput::Enter);
        assert_eq!(pids(&state), vec![3, 1]);
        assert!(!state.is_filtering());

        state.handle(ViewEvent::Refresh(Snapshot::new(vec![
            named(1, "bash"),
            named(4, "fish"),
            named(5, "sshd"),
        ])));
        assert_eq!(state.filter_text(), "SH");
        assert_eq!(pids(&state), vec![5, 4, 1]);
    }

    #[test]
    fn refiltering_keeps_the_selected_pid_when_visible() {
        let mut state = ViewState::default();
        state.handle(ViewEvent::Refresh(Snapshot::new(vec![
            named(1, "bash"),
            named(2, "nginx"),
            named(3, "zsh"),
        ])));
        select_pid(&mut state, 1);

        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "sh");
        assert_eq!(state.selected_item().map(|item| item.pid), Some(1));

        press(&mut state, KeyInput::Backspace);
        press(&mut state, KeyInput::Backspace);
        type_text(&mut state, "nginx");
        assert_eq!(state.selected_item().map(|item| item.pid), Some(2));
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn filter_without_matches_is_a_valid_empty_view() {
        let mut state = ViewState::default();
        refresh(&mut state, &[1, 2]);
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "no such process");

        assert!(state.items().is_empty());
        assert_eq!(state.selected(), None);
        assert_eq!(state.total_items(), 2);
        assert_eq!(press(&mut state, KeyInput::Down), Effect::None);
    }

    #[test]
    fn esc_while_filtering_cancels_and_clears() {
        let mut state = ViewState::default();
        refresh(&mut state, &[1, 2, 3]);
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "proc2");
        assert_eq!(pids(&state), vec![2]);

        press(&mut state, KeyInput::Esc);
        assert!(!state.is_filtering());
        assert_eq!(state.filter_text(), "");
        assert_eq!(pids(&state), vec![3, 2, 1]);
        assert_eq!(state.selected_item().map(|item| item.pid), Some(3));
    }

    fn shells_and_nginx() -> ViewState {
        let mut state = ViewState::default();
        state.handle(ViewEvent::Refresh(Snapshot::new(vec![
            named(1, "bash"),
            named(2, "nginx"),
            named(3, "zsh"),
        ])));
        select_pid(&mut state, 1);
        state
    }

    #[test]
    fn cancelling_a_filter_restores_the_hidden_selection() {
        let mut state = shells_and_nginx();
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "nginx");
        assert_eq!(state.selected_item().map(|item| item.pid), Some(2));

        press(&mut state, KeyInput::Esc);
        assert_eq!(pids(&state), vec![3, 2, 1]);
        assert_eq!(state.selected_item().map(|item| item.pid), Some(1));
        assert_eq!(state.selected(), Some(2));
    }

    #[test]
    fn confirming_a_filter_restores_the_selection_when_visible_again() {
        let mut state = shells_and_nginx();
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "z");
        assert_eq!(pids(&state), vec![3]);

        press(&mut state, KeyInput::Backspace);
        press(&mut state, KeyInput::Enter);
        assert_eq!(state.filter_text(), "");
        assert_eq!(state.selected_item().map(|item| item.pid), Some(1));
    }

    #[test]
    fn confirming_a_filter_that_hides_the_selection_selects_the_first_match() {
        let mut state = shells_and_nginx();
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "zsh");
        press(&mut state, KeyInput::Enter);

        assert_eq!(pids(&state), vec![3]);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn toggling_filter_mode_keeps_the_filter() {
        let mut state = ViewState::default();
        refresh(&mut state, &[1, 2]);
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "proc1");
        press(&mut state, KeyInput::Enter);
        press(&mut state, KeyInput::Char('/'));

        assert!(state.is_filtering());
        assert_eq!(state.filter_text(), "proc1");
        assert_eq!(pids(&state), vec![1]);
    }

    #[test]
    fn esc_in_normal_mode_clears_an_applied_filter() {
        let mut state = ViewState::default();
        refresh(&mut state, &[1, 2]);
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "proc1");
        press(&mut state, KeyInput::Enter);

        press(&mut state, KeyInput::Esc);
        assert_eq!(state.filter_text(), "");
        assert_eq!(pids(&state), vec![2, 1]);
    }

    #[test]
    fn letter_keys_are_filter_text_while_filtering() {
        let mut state = ViewState::default();
        refresh(&mut state, &[1]);
        press(&mut state, KeyInput::Char('/'));
        assert_eq!(press(&mut state, KeyInput::Char('q')), Effect::None);
        press(&mut state, KeyInput::Char('t'));

        assert!(!state.is_quit_requested());
        assert_eq!(state.layout(), LayoutMode::List);
        assert_eq!(state.filter_text(), "qt");
    }

    #[test]
    fn q_quits_and_later_events_are_ignored() {
        let mut state = ViewState::default();
        refresh(&mut state, &[1, 2]);
        assert_eq!(press(&mut state, KeyInput::Char('q')), Effect::Quit);
        assert!(state.is_quit_requested());

        let before = pids(&state);
        assert_eq!(refresh(&mut state, &[7, 8, 9]), Effect::None);
        assert_eq!(press(&mut state, KeyInput::Down), Effect::None);
        assert_eq!(pids(&state), before);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn interrupt_quits_even_while_filtering() {
        let mut state = ViewState::default();
        press(&mut state, KeyInput::Char('/'));
        assert_eq!(press(&mut state, KeyInput::Interrupt), Effect::Quit);
    }

    #[test]
    fn resize_keeps_selection_and_filter() {
        let mut state = ViewState::new(Viewport::new(80, 40), LayoutMode::Table);
        let all: Vec<u32> = (1..=100).collect();
        refresh(&mut state, &all);
        press(&mut state, KeyInput::Char('/'));
        type_text(&mut state, "proc");
        press(&mut state, KeyInput::Enter);
        press(&mut state, KeyInput::End);
        let selected = state.selected();

        state.handle(ViewEvent::Resize {
            width: 40,
            height: 12,
        });
        assert_eq!(state.viewport(), Viewport::new(40, 12));
        assert_eq!(state.selected(), selected);
        assert_eq!(state.filter_text(), "proc");
        assert_eq!(state.capacity(), 4);
        assert!(state.visible_window().iter().any(|item| item.pid == 1));
    }

    #[test]
    fn enumeration_failure_keeps_items_and_reports_status() {
        let mut state = ViewState::default();
        refresh(&mut state, &[1, 2, 3]);
        select_pid(&mut state, 2);
        let last_refresh = state.last_refresh();

        let effect = state.handle(ViewEvent::Refresh(Snapshot::enumeration_failed(
            "failed to enumerate processes: EMFILE",
        )));
        assert_eq!(effect, Effect::ScheduleRefresh);
        assert_eq!(pids(&state), vec![3, 2, 1]);
        assert_eq!(state.selected(), Some(1));
        assert_eq!(state.last_refresh(), last_refresh);
        assert_eq!(
            state.status(),
            Some("failed to enumerate processes: EMFILE")
        );

        refresh(&mut state, &[1, 2]);
        assert_eq!(state.status(), None);
    }

    #[test]
    fn layout_toggle_changes_capacity() {
        let mut state = ViewState::new(Viewport::new(80, 31), LayoutMode::List);
        assert_eq!(state.capacity(), 8);
        press(&mut state, KeyInput::Char('t'));
        assert_eq!(state.layout(), LayoutMode::Table);
        assert_eq!(state.capacity(), 23);
    }

    #[test]
    fn tiny_viewport_still_shows_one_item() {
        let mut state = ViewState::new(Viewport::new(10, 2), LayoutMode::List);
        refresh(&mut state, &[1, 2, 3]);
        assert_eq!(state.capacity(), 1);
        press(&mut state, KeyInput::Down);
        assert_eq!(state.visible_window().len(), 1);
        assert_eq!(state.visible_window()[0].pid, 2);
    }

    #[test]
    fn page_keys_move_by_capacity() {
        let mut state = ViewState::new(Viewport::new(80, 18), LayoutMode::Table);
        let all: Vec<u32> = (1..=50).collect();
        refresh(&mut state, &all);
        assert_eq!(state.capacity(), 10);

        press(&mut state, KeyInput::Right);
        assert_eq!(state.selected(), Some(10));
        assert_eq!(state.scroll_offset(), 1);
        press(&mut state, KeyInput::Char('l'));
        assert_eq!(state.selected(), Some(20));
        press(&mut state, KeyInput::Left);
        assert_eq!(state.selected(), Some(10));
        press(&mut state, KeyInput::Char('G'));
        assert_eq!(state.selected(), Some(49));
        assert_eq!(state.scroll_offset(), 40);
        press(&mut state, KeyInput::Char('g'));
        assert_eq!((state.selected(), state.scroll_offset()), (Some(0), 0));
    }

    #[test]
    fn transition_is_a_pure_wrapper() {
        let state = ViewState::default();
        let (state, effect) = transition(state, ViewEvent::Refresh(snapshot(&[4, 2])));
        assert_eq!(effect, Effect::ScheduleRefresh);
        let (state, effect) = transition(state, ViewEvent::Key(KeyInput::Down));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.selected_item().map(|item| item.pid), Some(2));
    }

    fn key_strategy() -> impl Strategy<Value = KeyInput> {
        prop_oneof![
            Just(KeyInput::Up),
            Just(KeyInput::Down),
            Just(KeyInput::Left),
            Just(KeyInput::Right),
            Just(KeyInput::PageUp),
            Just(KeyInput::PageDown),
            Just(KeyInput::Home),
            Just(KeyInput::End),
            Just(KeyInput::Char('j')),
            Just(KeyInput::Char('k')),
            Just(KeyInput::Char('t')),
        ]
    }

    fn assert_window_invariants(state: &ViewState) -> Result<(), TestCaseError> {
        match state.selected() {
            None => prop_assert!(state.items().is_empty()),
            Some(index) => {
                prop_assert!(index < state.items().len());
                prop_assert!(index >= state.scroll_offset());
                prop_assert!(index < state.scroll_offset() + state.capacity());
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn navigation_keeps_selection_in_bounds_and_visible(
            count in 0usize..120,
            height in 0u16..60,
            keys in proptest::collection::vec(key_strategy(), 0..64),
        ) {
            let mut state = ViewState::new(Viewport::new(80, height), LayoutMode::List);
            let all: Vec<u32> = (1..=count as u32).collect();
            refresh(&mut state, &all);

            for key in keys {
                press(&mut state, key);
                assert_window_invariants(&state)?;
            }
        }

        #[test]
        fn navigation_at_bounds_is_idempotent(count in 1usize..80, height in 0u16..40) {
            let mut state = ViewState::new(Viewport::new(80, height), LayoutMode::Table);
            let all: Vec<u32> = (1..=count as u32).collect();
            refresh(&mut state, &all);

            press(&mut state, KeyInput::Home);
            let top = (state.selected(), state.scroll_offset());
            for key in [KeyInput::Up, KeyInput::PageUp, KeyInput::Left, KeyInput::Home] {
                press(&mut state, key);
                prop_assert_eq!((state.selected(), state.scroll_offset()), top);
            }

            press(&mut state, KeyInput::End);
            let bottom = (state.selected(), state.scroll_offset());
            prop_assert_eq!(bottom.0, Some(count - 1));
            for key in [KeyInput::Down, KeyInput::PageDown, KeyInput::Right, KeyInput::End] {
                press(&mut state, key);
                prop_assert_eq!((state.selected(), state.scroll_offset()), bottom);
            }
        }

        #[test]
        fn selection_survives_refresh_exactly_when_pid_survives(
            before in proptest::collection::btree_set(1u32..200, 1..40),
            after in proptest::collection::btree_set(1u32..200, 0..40),
            pick in any::<proptest::sample::Index>(),
        ) {
            let before: Vec<u32> = before.into_iter().collect();
            let after: Vec<u32> = after.into_iter().collect();
            let chosen = before[pick.index(before.len())];

            let mut state = ViewState::new(Viewport::new(80, 200), LayoutMode::Table);
            refresh(&mut state, &before);
            select_pid(&mut state, chosen);
            refresh(&mut state, &after);

            if after.contains(&chosen) {
                prop_assert_eq!(state.selected_item().map(|item| item.pid), Some(chosen));
            } else if after.is_empty() {
                prop_assert_eq!(state.selected(), None);
            } else {
                prop_assert_eq!(state.selected(), Some(0));
            }
            assert_window_invariants(&state)?;
        }

        #[test]
        fn cancelling_any_filter_reselects_the_previous_pid(
            count in 1usize..60,
            pick in any::<proptest::sample::Index>(),
            filter in "[a-z0-9 ]{0,8}",
        ) {
            let all: Vec<u32> = (1..=count as u32).collect();
            let chosen = all[pick.index(all.len())];

            let mut state = ViewState::new(Viewport::new(80, 40), LayoutMode::Table);
            refresh(&mut state, &all);
            select_pid(&mut state, chosen);

            press(&mut state, KeyInput::Char('/'));
            type_text(&mut state, &filter);
            press(&mut state, KeyInput::Esc);

            prop_assert_eq!(state.filter_text(), "");
            prop_assert_eq!(state.selected_item().map(|item| item.pid), Some(chosen));
            assert_window_invariants(&state)?;
        }
    }
}
