//! Shared TUI building blocks

pub mod theme;
