//! Render a latency/throughput table for a sweep results directory.

use std::path::PathBuf;

use baseten_bench::summary;
use clap::Parser;

#[derive(Parser)]
#[command(name = "bench-summary")]
#[command(about = "Summarise the result files collected by a benchmark sweep")]
#[command(version)]
struct Cli {
    /// Sweep results directory (baseten_comparison_results_<timestamp>)
    results_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .try_init();

    match summary::summarize_dir(&cli.results_dir) {
        Ok(table) => println!("{}", table),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
