//! CLI library components for the attribute dependency tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
