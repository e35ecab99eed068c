use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brc_engine::{run_file, Discovery, MalformedPolicy, RunConfig};

#[derive(Debug, Parser)]
#[command(version, about = "Per-key min/avg/max over `key;value` lines")]
struct Args {
    /// Input file, one `key;value` record per line
    path: PathBuf,

    /// Worker threads [default: logical core count]
    #[arg(long)]
    workers: Option<usize>,

    /// Bytes scanned sequentially to discover keys
    #[arg(long, default_value_t = brc_engine::config::DEFAULT_PREFIX_BYTES)]
    prefix_bytes: usize,

    /// Sweep the whole file for keys instead of trusting the prefix
    #[arg(long)]
    full_discovery: bool,

    /// Maximum number of distinct keys
    #[arg(long, default_value_t = brc_engine::config::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Hash seed [default: random]
    #[arg(long)]
    seed: Option<u64>,

    /// Count and skip malformed records instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Aggregate without printing the result
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> RunConfig {
        let mut config = RunConfig::default()
            .with_prefix_bytes(self.prefix_bytes)
            .with_capacity(self.capacity);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.full_discovery {
            config = config.with_discovery(Discovery::Full);
        }
        if self.skip_malformed {
            config = config.with_malformed(MalformedPolicy::Skip);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();
    let start = Instant::now();

    let summary = if args.quiet {
        run_file(&args.path, &config, &mut io::sink())
    } else {
        run_file(&args.path, &config, &mut io::stdout().lock())
    }
    .with_context(|| format!("aggregating {}", args.path.display()))?;

    info!(
        records = summary.records,
        keys = summary.keys,
        malformed = summary.malformed,
        elapsed = ?start.elapsed(),
        "done"
    );
    Ok(())
}
