//! Theme - immutable style set handed to the renderer
//!
//! The colored palette follows Dracula; `monochrome` keeps only modifiers so
//! the view stays readable with `--no-color`.

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub title: Style,
    pub pid: Style,
    pub name: Style,
    pub cpu: Style,
    pub memory: Style,
    pub date: Style,
    pub command: Style,
    pub label: Style,
    pub selected: Style,
    pub muted: Style,
    pub error: Style,
    pub prompt: Style,
}

impl Theme {
    pub fn dracula() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Rgb(0xFF, 0x79, 0xC6))
                .add_modifier(Modifier::BOLD),
            pid: Style::default().fg(Color::Rgb(0xFF, 0x55, 0x55)),
            name: Style::default()
                .fg(Color::Rgb(0x8B, 0xE9, 0xFD))
                .add_modifier(Modifier::BOLD),
            cpu: Style::default().fg(Color::Rgb(0xFF, 0xB8, 0x6C)),
            memory: Style::default().fg(Color::Rgb(0x50, 0xFA, 0x7B)),
            date: Style::default().fg(Color::Rgb(0x01, 0xBA, 0xEF)),
            command: Style::default().fg(Color::Rgb(0xBD, 0x93, 0xF9)),
            label: Style::default().fg(Color::Gray),
            selected: Style::default()
                .bg(Color::Rgb(0x44, 0x47, 0x5A))
                .add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::LightRed),
            prompt: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn monochrome() -> Self {
        let plain = Style::default();
        Self {
            title: plain.add_modifier(Modifier::BOLD),
            pid: plain,
            name: plain.add_modifier(Modifier::BOLD),
            cpu: plain,
            memory: plain,
            date: plain,
            command: plain,
            label: plain,
            selected: plain.add_modifier(Modifier::REVERSED),
            muted: plain,
            error: plain.add_modifier(Modifier::BOLD),
            prompt: plain.add_modifier(Modifier::BOLD),
        }
    }

    pub fn for_color(color: bool) -> Self {
        if color {
            Self::dracula()
        } else {
            Self::monochrome()
        }
    }

    pub fn span(text: impl Into<String>, style: Style) -> Span<'static> {
        Span::styled(text.into(), style)
    }

    /// `label: value` pair with the label muted.
    pub fn labelled(&self, label: &str, value: impl Into<String>, style: Style) -> Vec<Span<'static>> {
        vec![
            Self::span(format!("{label}: "), self.label),
            Self::span(value, style),
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dracula()
    }
}
