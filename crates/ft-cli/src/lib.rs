//! Flextime timewarrior extension library.
//!
//! Reads timewarrior extension input, sums tracked time per day and reports
//! the difference to the configured daily targets.

mod cli;
pub mod config;
pub mod printer;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use ft_core::Reader;
use tracing_subscriber::EnvFilter;

pub use cli::Cli;
pub use config::{ReportConfig, Settings, TimeTargets};

/// Runs the report: reads config and entries from `input`, writes the table
/// to `output`.
///
/// `cli` flags force verbose or debug mode on.
pub fn run<R: BufRead, W: Write>(input: R, output: &mut W, cli: &Cli) -> Result<()> {
    let mut reader = Reader::new(input);

    let raw = reader
        .read_config()
        .context("read config section")
        .context("read config")?;
    let mut config = ReportConfig::from_config(&raw).context("read config")?;
    config.verbose |= cli.verbose;
    config.debug |= cli.debug;

    let filter = if config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting");
    for (key, value) in raw.iter() {
        tracing::trace!(%key, %value, "config directive");
    }
    tracing::debug!(
        offset = %printer::fmt_duration(config.offset),
        targets = %config.targets,
        strategy = %config.strategy,
        debug = config.debug,
        verbose = config.verbose,
        "resolved configuration"
    );

    let entries = reader.read_entries().context("read entries")?;
    tracing::debug!(count = entries.len(), "read entries");

    let sums = config.strategy.aggregate(entries);

    printer::print_sums(output, &config, &sums).context("print report")
}
