use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use hamsat::*;
use tracing_subscriber::EnvFilter;

/// Decides a clause file with DPLL and writes the assignment for the path decoder
#[derive(Parser)]
#[command(name = "hamsat", version)]
struct Cli {
    /// Clause file: one clause per line, a line holding `0`, then the trailer
    input: PathBuf,

    /// Where to write the assignment
    #[arg(short, long, default_value = "DPLLResults.txt")]
    output: PathBuf,

    /// Give up after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Print search statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let formula = Formula::parse_file(&cli.input)
        .with_context(|| format!("could not read clauses from {}", cli.input.display()))?;

    let mut config = SolverConfig::new();
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let report = formula.solve_with(config).context("search did not finish")?;

    if cli.stats {
        let stats = report.stats;
        eprintln!("c nodes       {}", stats.nodes);
        eprintln!("c pure        {}", stats.pure_decisions);
        eprintln!("c unit        {}", stats.unit_decisions);
        eprintln!("c branches    {}", stats.branches);
        eprintln!("c backtracks  {}", stats.backtracks);
        eprintln!("c solved in {}ms", start.elapsed().as_millis());
    }

    report
        .write_file(&cli.output)
        .with_context(|| format!("could not write {}", cli.output.display()))?;

    tracing::info!(
        satisfiable = report.solution.is_sat(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "solved"
    );
    Ok(())
}
