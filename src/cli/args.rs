//! CLI argument definitions using clap
//!
//! Commands:
//! - pinboard init --config <path>
//! - pinboard start --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pinboard - a small CRUD REST service backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "pinboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file and create the database
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./pinboard.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./pinboard.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
