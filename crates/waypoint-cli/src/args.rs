//! Command-line argument definitions for the Waypoint CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, layout forcing and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Waypoint flow graph layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input flow graph (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output flow graph (JSON)
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Recompute positions even if every node already has one
    #[arg(short, long)]
    pub force: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
