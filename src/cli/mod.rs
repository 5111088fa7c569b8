//! CLI module for pinboard
//!
//! Provides the command-line interface:
//! - init: write a default config and create the database
//! - start: boot the store and serve the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, start, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
