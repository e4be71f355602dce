//! # Sweep Driver
//!
//! Runs the single-run driver once per concurrency level in a fixed order,
//! inserting cool-down delays between runs so the hosted endpoint's rate
//! limiter recovers, and collecting every result file into one timestamped
//! directory. A failure at one level never aborts the sweep.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tracing::{error, info};

use crate::config::Config;
use crate::error::BenchError;

/// Concurrency levels exercised by a sweep, in run order.
pub const CONCURRENCY_LEVELS: [u64; 5] = [4, 8, 16, 32, 64];

/// Prompts dispatched per run, relative to the concurrency bound.
pub const PROMPTS_PER_CONCURRENCY: u64 = 10;

/// Cool-down before running at `concurrency`.
///
/// Tiers, largest applicable first: 180s at 64 and above, 120s at 16 and
/// above, 60s above 8, 30s otherwise. The observable delays for the sweep's
/// own levels are 30s before 8, 120s before 16 and 32, and 180s before 64.
pub fn delay_before(concurrency: u64) -> Duration {
    let secs = if concurrency >= 64 {
        180
    } else if concurrency >= 16 {
        120
    } else if concurrency > 8 {
        60
    } else {
        30
    };
    Duration::from_secs(secs)
}

/// One planned run of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub concurrency: u64,
    pub num_prompts: u64,
    pub result_filename: String,
    /// Cool-down slept before this run; zero for the first run of a sweep.
    pub delay_before: Duration,
}

/// Every run of a sweep, derived once so all result files share a single
/// timestamp and directory.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub timestamp: String,
    pub results_dir: PathBuf,
    pub runs: Vec<RunSpec>,
}

impl SweepPlan {
    /// Plan a sweep stamped with the current local time.
    pub fn new() -> Self {
        Self::with_timestamp(Local::now().format("%Y%m%d_%H%M%S").to_string())
    }

    /// Plan a sweep with an explicit timestamp.
    pub fn with_timestamp(timestamp: String) -> Self {
        let results_dir = PathBuf::from(format!("baseten_comparison_results_{}", timestamp));
        let runs = CONCURRENCY_LEVELS
            .iter()
            .enumerate()
            .map(|(i, &concurrency)| RunSpec {
                concurrency,
                num_prompts: concurrency * PROMPTS_PER_CONCURRENCY,
                result_filename: format!("baseten_conc{}_{}.json", concurrency, timestamp),
                delay_before: if i == 0 {
                    Duration::ZERO
                } else {
                    delay_before(concurrency)
                },
            })
            .collect();

        Self {
            timestamp,
            results_dir,
            runs,
        }
    }

    /// Configuration for one planned run, derived from the sweep-wide config.
    pub fn config_for(&self, base: &Config, run: &RunSpec) -> Config {
        let mut config = base.clone();
        config.concurrency = run.concurrency;
        config.num_prompts = Some(run.num_prompts);
        config.result_dir = self.results_dir.clone();
        config.result_filename = run.result_filename.clone();
        config
    }

    /// Execute every planned run in order.
    ///
    /// A failed run is logged with its concurrency level and the sweep moves
    /// on to the next one; the outcome records both completed and failed
    /// levels.
    pub async fn execute<F, Fut>(&self, mut run: F) -> SweepOutcome
    where
        F: FnMut(RunSpec) -> Fut,
        Fut: Future<Output = Result<PathBuf, BenchError>>,
    {
        let mut outcome = SweepOutcome::default();
        let total = self.runs.len();

        for (i, spec) in self.runs.iter().enumerate() {
            if !spec.delay_before.is_zero() {
                info!(
                    "Waiting {}s before the next run to avoid rate limiting",
                    spec.delay_before.as_secs()
                );
                tokio::time::sleep(spec.delay_before).await;
            }

            info!(
                "[{}/{}] Running benchmark at concurrency {}",
                i + 1,
                total,
                spec.concurrency
            );

            match run(spec.clone()).await {
                Ok(path) => {
                    info!(
                        "Concurrency {} finished, results in {}",
                        spec.concurrency,
                        path.display()
                    );
                    outcome.completed.push(spec.concurrency);
                }
                Err(err) => {
                    error!("Benchmark at concurrency {} failed: {}", spec.concurrency, err);
                    outcome.failed.push(spec.concurrency);
                }
            }
        }

        outcome
    }
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self::new()
    }
}

/// Which concurrency levels of a sweep completed and which failed.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    pub completed: Vec<u64>,
    pub failed: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_covers_levels_in_order() {
        let plan = SweepPlan::with_timestamp("20250101_000000".to_string());
        let levels: Vec<u64> = plan.runs.iter().map(|r| r.concurrency).collect();
        assert_eq!(levels, vec![4, 8, 16, 32, 64]);
    }

    #[test]
    fn test_delay_vector_for_sweep_levels() {
        let plan = SweepPlan::with_timestamp("20250101_000000".to_string());
        let delays: Vec<u64> = plan.runs.iter().map(|r| r.delay_before.as_secs()).collect();
        assert_eq!(delays, vec![0, 30, 120, 120, 180]);
    }

    #[test]
    fn test_delay_tiers() {
        assert_eq!(delay_before(4).as_secs(), 30);
        assert_eq!(delay_before(8).as_secs(), 30);
        assert_eq!(delay_before(9).as_secs(), 60);
        assert_eq!(delay_before(15).as_secs(), 60);
        assert_eq!(delay_before(16).as_secs(), 120);
        assert_eq!(delay_before(32).as_secs(), 120);
        assert_eq!(delay_before(63).as_secs(), 120);
        assert_eq!(delay_before(64).as_secs(), 180);
        assert_eq!(delay_before(128).as_secs(), 180);
    }

    #[test]
    fn test_prompt_count_is_ten_per_concurrency() {
        let plan = SweepPlan::with_timestamp("20250101_000000".to_string());
        for run in &plan.runs {
            assert_eq!(run.num_prompts, run.concurrency * 10);
        }
    }

    #[test]
    fn test_artifact_naming_embeds_level_and_shared_timestamp() {
        let plan = SweepPlan::with_timestamp("20250101_000000".to_string());
        assert_eq!(
            plan.results_dir,
            PathBuf::from("baseten_comparison_results_20250101_000000")
        );
        assert_eq!(plan.runs[0].result_filename, "baseten_conc4_20250101_000000.json");
        assert_eq!(plan.runs[4].result_filename, "baseten_conc64_20250101_000000.json");
    }

    #[test]
    fn test_config_for_overrides_per_run_fields_only() {
        let plan = SweepPlan::with_timestamp("20250101_000000".to_string());
        let base = Config::for_test();
        let spec = &plan.runs[2];

        let config = plan.config_for(&base, spec);
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.num_prompts, Some(160));
        assert_eq!(config.result_dir, plan.results_dir);
        assert_eq!(config.result_filename, spec.result_filename);
        assert_eq!(config.model, base.model);
        assert_eq!(config.base_url, base.base_url);
    }
}
