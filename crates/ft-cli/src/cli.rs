//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Timewarrior report extension for flexible working hours.
///
/// Reads the extension input timewarrior passes on stdin, sums the tracked
/// time per day and compares it with the configured daily target.
#[derive(Debug, Parser)]
#[command(name = "flextime", version, about, long_about = None)]
pub struct Cli {
    /// Read extension input from a file instead of stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Show one row per day, regardless of the timewarrior setting.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print diagnostics to stderr, regardless of the timewarrior setting.
    #[arg(short, long)]
    pub debug: bool,
}
