//! Common constants used across the project

pub mod constants;
