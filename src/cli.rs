//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for fsq using the `clap` crate.
//! With no arguments fsq starts its interactive shell; `-c` runs one
//! query and exits, which keeps the tool usable from scripts.
//!
//! # Examples
//!
//! ```bash
//! # Start the interactive shell
//! fsq
//!
//! # Run a single query and exit
//! fsq -c "select name, size from '.'"
//!
//! # Quiet mode (only result tables, no banner or timing)
//! fsq -q -c "r select name from 'src'"
//! ```

use clap::Parser;

/// A SQL-like query engine for searching and deleting filesystem entries
#[derive(Parser, Debug)]
#[command(name = "fsq", version, about, long_about = None)]
pub struct Cli {
    /// Run a single query and exit instead of starting the shell
    #[arg(short = 'c', long = "command", value_name = "QUERY")]
    pub command: Option<String>,

    /// Suppress informational output (banner, timing messages)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
