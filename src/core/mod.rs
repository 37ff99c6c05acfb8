//! Core monitoring logic
//!
//! Process fact sources, snapshot construction, the refresh scheduler and the
//! live view state machine. Nothing in here touches the terminal.

pub mod item;
pub mod models;
pub mod scheduler;
pub mod snapshot;
pub mod source;
pub mod view;
