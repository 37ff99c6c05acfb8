//! Frame rendering for the live view
//!
//! Reads `ViewState` through its accessors only. Row budgets here must match
//! `LayoutMode::chrome_rows` and `LayoutMode::rows_per_item`, otherwise the
//! state machine's page size and the visible window disagree.

use std::time::Duration;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::common::constants::{app, messages};
use crate::core::item::{ItemColumns, ProcessItem};
use crate::core::view::{LayoutMode, ViewState};
use crate::tui::components::theme::Theme;

const HEADER_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 2;
const SELECTED_PREFIX: &str = "> ";
const UNSELECTED_PREFIX: &str = "  ";
const DETAIL_INDENT: &str = "    ";

pub fn render(frame: &mut Frame, state: &ViewState, theme: &Theme, interval: Duration) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(1),
            Constraint::Length(FOOTER_ROWS),
        ])
        .split(frame.size());

    render_header(frame, chunks[0], state, theme, interval);
    if state.items().is_empty() {
        render_empty(frame, chunks[1], state, theme);
    } else {
        match state.layout() {
            LayoutMode::List => render_list(frame, chunks[1], state, theme),
            LayoutMode::Table => render_table(frame, chunks[1], state, theme),
        }
    }
    render_footer(frame, chunks[2], state, theme);
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    theme: &Theme,
    interval: Duration,
) {
    let updated = match state.last_refresh() {
        Some(at) => format!(
            "Last updated : {} ({})",
            at.with_timezone(&Local).format("%H:%M:%S"),
            format_interval(interval)
        ),
        None => messages::STATUS_WAITING.to_string(),
    };
    let line = Line::from(vec![
        Span::styled(format!("{} v{}", app::NAME, app::VERSION), theme.title),
        Span::styled(" | ", theme.muted),
        Span::styled(updated, theme.date),
    ]);

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn body_block(state: &ViewState) -> Block<'static> {
    let title = if state.filter_text().is_empty() {
        " Processes ".to_string()
    } else {
        format!(" Processes matching \"{}\" ", state.filter_text())
    };
    Block::default().borders(Borders::ALL).title(title)
}

fn render_empty(frame: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let message = if state.last_refresh().is_none() {
        messages::STATUS_WAITING
    } else if !state.filter_text().is_empty() {
        messages::NO_MATCHES
    } else {
        "No processes."
    };
    let empty = Paragraph::new(Span::styled(message, theme.muted))
        .alignment(Alignment::Center)
        .block(body_block(state));
    frame.render_widget(empty, area);
}

fn is_selected(state: &ViewState, offset: usize) -> bool {
    state.selected() == Some(state.scroll_offset() + offset)
}

/// Three rows per process: title, command line, resource usage.
fn list_lines(item: &ProcessItem, selected: bool, theme: &Theme) -> [Line<'static>; 3] {
    let prefix = if selected {
        SELECTED_PREFIX
    } else {
        UNSELECTED_PREFIX
    };
    let columns = &item.columns;

    let title = vec![
        Span::styled(prefix, theme.prompt),
        Span::styled(format!("({})", item.pid), theme.pid),
        Span::raw(" "),
        Span::styled(columns.name.clone(), theme.name),
    ];

    let mut command = vec![Span::raw(DETAIL_INDENT)];
    command.extend(theme.labelled("CMD", item.command_line.clone(), theme.command));

    let mut usage = vec![Span::raw(DETAIL_INDENT)];
    usage.extend(theme.labelled(
        "RAM",
        format!("{}% ({})", columns.memory_percent, columns.memory_resident),
        theme.memory,
    ));
    usage.push(Span::styled(" | ", theme.muted));
    usage.extend(theme.labelled("CPU", format!("{}%", columns.cpu), theme.cpu));
    usage.push(Span::styled(" | ", theme.muted));
    usage.extend(theme.labelled("PPID", columns.parent_pid.clone(), theme.pid));
    usage.push(Span::styled(" | ", theme.muted));
    usage.extend(theme.labelled("Created", columns.created.clone(), theme.date));

    let mut rows = [title, command, usage];
    if selected {
        for span in rows.iter_mut().flatten() {
            span.style = span.style.patch(theme.selected);
        }
    }
    rows.map(Line::from)
}

fn render_list(frame: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let lines: Vec<Line> = state
        .visible_window()
        .iter()
        .enumerate()
        .flat_map(|(offset, item)| list_lines(item, is_selected(state, offset), theme))
        .collect();

    let list = Paragraph::new(lines).block(body_block(state));
    frame.render_widget(list, area);
}

fn render_table(frame: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let header = Row::new(
        ItemColumns::HEADERS
            .iter()
            .map(|title| Cell::from(*title).style(theme.title)),
    );

    let rows: Vec<Row> = state
        .visible_window()
        .iter()
        .enumerate()
        .map(|(offset, item)| {
            let columns = &item.columns;
            let row = Row::new(vec![
                Cell::from(columns.pid.clone()).style(theme.pid),
                Cell::from(columns.name.clone()).style(theme.name),
                Cell::from(columns.cpu.clone()).style(theme.cpu),
                Cell::from(columns.memory_percent.clone()).style(theme.memory),
                Cell::from(columns.memory_resident.clone()).style(theme.memory),
                Cell::from(columns.parent_pid.clone()).style(theme.pid),
                Cell::from(columns.created.clone()).style(theme.date),
            ]);
            if is_selected(state, offset) {
                row.style(theme.selected)
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Min(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(7),
        Constraint::Length(19),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(body_block(state));
    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let summary = if state.is_filtering() {
        Line::from(vec![
            Span::styled("Filter: ", theme.prompt),
            Span::raw(format!("{}_", state.filter_text())),
        ])
    } else if let Some(status) = state.status() {
        Line::from(Span::styled(status.to_string(), theme.error))
    } else if state.filter_text().is_empty() {
        Line::from(Span::styled(
            format!("{} processes", state.items().len()),
            theme.muted,
        ))
    } else {
        Line::from(Span::styled(
            format!(
                "{}/{} processes matching \"{}\"",
                state.items().len(),
                state.total_items(),
                state.filter_text()
            ),
            theme.muted,
        ))
    };

    let help = if state.is_filtering() {
        messages::HELP_FILTERING
    } else {
        messages::HELP_NORMAL
    };

    let footer = Paragraph::new(vec![summary, Line::from(Span::styled(help, theme.muted))]);
    frame.render_widget(footer, area);
}

/// `3s`, `1m30s`, `250ms`.
fn format_interval(interval: Duration) -> String {
    let millis = interval.as_millis();
    if millis % 1_000 != 0 {
        return format!("{millis}ms");
    }
    let secs = interval.as_secs();
    match (secs / 60, secs % 60) {
        (0, secs) => format!("{secs}s"),
        (mins, 0) => format!("{mins}m"),
        (mins, secs) => format!("{mins}m{secs}s"),
    }
}
