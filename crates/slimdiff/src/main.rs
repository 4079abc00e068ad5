mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use slimdiff_core::{logging, Config};
use slimdiff_diff::DiffCompactor;
use std::io::{self, Read, Write};

fn main() {
    let cli = Cli::parse();
    let guard = logging::init(&cli.log_level);

    let result = run(cli);
    drop(guard);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let diff_config = cli.diff_config(config.diff_or_default());
    let compactor =
        DiffCompactor::from_config(&diff_config).context("invalid compaction settings")?;

    tracing::debug!(
        options = ?compactor.options(),
        ignore_rules = compactor.rules().patterns().len(),
        "compactor ready"
    );

    let input = read_stdin()?;
    let compaction = compactor.run(&input);
    let report = &compaction.report;

    if report.is_large() {
        tracing::info!(bytes = report.output_bytes, "large changeset");
    }

    write_stdout(&compaction.text)?;

    if cli.json {
        eprintln!("{}", serde_json::to_string_pretty(report)?);
    } else if cli.stats {
        eprintln!("{}", report.summary());
    }

    Ok(())
}

/// Read the whole diff; invalid UTF-8 is replaced rather than rejected
fn read_stdin() -> Result<String> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("failed to read diff from stdin")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();

    // The reader may close the pipe early (e.g. `| head`)
    let written = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush());
    match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("failed to write output"),
    }
}
