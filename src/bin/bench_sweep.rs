//! Concurrency sweep against a hosted endpoint.
//!
//! Runs the single-run driver once per concurrency level (4, 8, 16, 32,
//! 64), with cool-down delays between runs, writing every result into one
//! timestamped directory. A failed level is logged and the sweep continues.

use baseten_bench::{runner, sweep, Config, SweepPlan};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Validates endpoint and authentication up front; exits 1 with a
    // descriptive message before any subprocess or directory side effect.
    let config = Config::parse_args();

    let plan = SweepPlan::new();

    info!("Model: {}", config.model);
    info!("Tokenizer: {}", config.tokenizer);
    info!("ISL/OSL: {}/{}", config.input_len, config.output_len);
    info!("Range ratio: {}", config.random_range_ratio);
    info!("Concurrency levels: {:?}", sweep::CONCURRENCY_LEVELS);
    info!("Results directory: {}", plan.results_dir.display());

    if let Err(err) = tokio::fs::create_dir_all(&plan.results_dir).await {
        error!(
            "Could not create results directory {}: {}",
            plan.results_dir.display(),
            err
        );
        std::process::exit(1);
    }

    let outcome = plan
        .execute(|spec| {
            let run_config = plan.config_for(&config, &spec);
            async move { runner::run_once(&run_config).await }
        })
        .await;

    info!(
        "Sweep finished: {} completed, {} failed",
        outcome.completed.len(),
        outcome.failed.len()
    );
    if !outcome.failed.is_empty() {
        warn!("Failed concurrency levels: {:?}", outcome.failed);
    }
    info!("Results in {}", plan.results_dir.display());
    info!(
        "Compare the runs with: bench-summary {}",
        plan.results_dir.display()
    );
}
