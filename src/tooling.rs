//! Tooling Layer
//!
//! Command-line entry points and report formatting for the compiler.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, CommandOutput, Commands};
