//! Runs the benchmark suite and prints a table of mean durations.
//!
//! Pass `--quick` for a shortened run. Log verbosity is controlled by `RUST_LOG`.

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use cbc_bench::bench::{Report, TracingSink};
use cbc_bench::bench::suite::{run_suite, SuiteConfig};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1).as_deref() {
        None => SuiteConfig::default(),
        Some("--quick") => SuiteConfig::quick(),
        Some(other) => bail!("unknown argument `{}` (expected `--quick`)", other),
    };

    let mut report = Report::default();
    run_suite(&config, &mut (&mut report, TracingSink)).context("benchmark run failed")?;

    print!("{}", report);
    Ok(())
}
