//! Command-line surface
//!
//! Argument parsing and the non-interactive subcommands.

pub mod parser;
pub mod snapshot;
pub mod table_format;

// Re-exports (used by main.rs)
pub use parser::*;
