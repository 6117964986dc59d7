use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use ft_cli::Cli;

fn try_main(cli: &Cli) -> Result<()> {
    let mut stdout = io::stdout().lock();

    match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open input file {}", path.display()))?;
            ft_cli::run(BufReader::new(file), &mut stdout, cli)
        }
        None => ft_cli::run(io::stdin().lock(), &mut stdout, cli),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
