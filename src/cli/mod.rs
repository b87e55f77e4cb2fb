//! CLI module
//!
//! Command-line interface for replaying pagination fixtures.
//!
//! # Commands
//!
//! - `replay` - Drive a pagination model over fixture pages
//! - `validate` - Check a fixture and summarize its pages

mod commands;
mod runner;

pub use commands::{Action, Cli, Commands, OutputFormat};
pub use runner::Runner;
