use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stock_stats::generate::{generate, GeneratorConfig};
use stock_stats::report::{render, render_summary, DEFAULT_PRECISION};
use stock_stats::{collect_inputs, Engine, EngineConfig, SourceKind};

/// Per-ticker min / max / average of the daily change
#[derive(Parser)]
#[command(name = "stock-stats", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate one or more CSV files (directories are expanded)
    Aggregate {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Stop at the first input that cannot be read
        #[arg(long)]
        fail_fast: bool,

        /// Memory-map inputs instead of reading them through a buffer
        #[arg(long)]
        mapped: bool,

        /// Fractional digits in the report
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: usize,

        /// Run the aggregation exactly this many times; above one, the mean
        /// time per run is printed after the report of the last run
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        repeat: u32,
    },

    /// Write synthetic stock files
    Generate {
        dir: PathBuf,

        #[arg(long, default_value_t = 5)]
        files: usize,

        #[arg(long, default_value_t = 1_000_000)]
        records: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stock_stats=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Aggregate {
            paths,
            fail_fast,
            mapped,
            precision,
            repeat,
        } => {
            let source = if mapped { SourceKind::Mapped } else { SourceKind::Buffered };
            let engine = Engine::new(
                EngineConfig::default()
                    .with_fail_fast(fail_fast)
                    .with_source(source),
            )?;
            let inputs = collect_inputs(&paths)?;

            let mut outcome = Ok(None);
            let elapsed = timeit(
                || {
                    if outcome.is_ok() {
                        outcome = engine.run(&inputs).map(Some);
                    }
                },
                repeat,
            );
            let aggregation = outcome?.ok_or_else(|| anyhow::anyhow!("aggregation never ran"))?;

            for line in render(&aggregation.table, precision) {
                println!("{line}");
            }
            println!("{}", render_summary(&aggregation.summary));
            for failure in &aggregation.summary.failed_inputs {
                eprintln!("{failure}");
            }
            if repeat > 1 {
                println!("mean over {repeat} runs: {elapsed:?}");
            }
        }
        Commands::Generate {
            dir,
            files,
            records,
            seed,
        } => {
            let config = GeneratorConfig::new(dir)
                .with_file_count(files)
                .with_records_per_file(records)
                .with_seed(seed);
            let written = generate(&config)?;
            let total: u64 = written.iter().map(|f| f.bytes).sum();
            for file in &written {
                println!("{} ({:.2} KB)", file.path.display(), file.bytes as f64 / 1024.0);
            }
            println!("Total records: {}", files * records);
            println!("Total size: {:.2} MB", total as f64 / 1024.0 / 1024.0);
        }
    }
    Ok(())
}

fn timeit<F: FnMut()>(mut f: F, count: u32) -> std::time::Duration {
    let start = std::time::Instant::now();
    for _ in 0..count {
        f();
    }
    start.elapsed() / count
}
