//! # Results Summariser
//!
//! Read-only consumer of the result files a sweep leaves behind. Loads every
//! JSON file in a results directory, tolerating the missing or partial files
//! a failed run may leave, and renders the latency percentiles and
//! throughput per concurrency level as a table.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::warn;

use crate::error::BenchError;

/// Subset of the result JSON written by the load generator.
///
/// The schema is owned by the external tool; every field is optional so a
/// partial file still yields a row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchResult {
    #[serde(default)]
    pub max_concurrency: Option<u64>,
    #[serde(default)]
    pub completed: Option<u64>,
    #[serde(default)]
    pub num_prompts: Option<u64>,
    #[serde(default)]
    pub request_throughput: Option<f64>,
    #[serde(default)]
    pub output_throughput: Option<f64>,
    #[serde(default)]
    pub total_token_throughput: Option<f64>,
    #[serde(default)]
    pub mean_ttft_ms: Option<f64>,
    #[serde(default)]
    pub median_ttft_ms: Option<f64>,
    #[serde(default)]
    pub p99_ttft_ms: Option<f64>,
    #[serde(default)]
    pub mean_tpot_ms: Option<f64>,
    #[serde(default)]
    pub median_tpot_ms: Option<f64>,
    #[serde(default)]
    pub p99_tpot_ms: Option<f64>,
    #[serde(default)]
    pub mean_itl_ms: Option<f64>,
    #[serde(default)]
    pub median_itl_ms: Option<f64>,
    #[serde(default)]
    pub p99_itl_ms: Option<f64>,
    #[serde(default)]
    pub mean_e2el_ms: Option<f64>,
    #[serde(default)]
    pub median_e2el_ms: Option<f64>,
    #[serde(default)]
    pub p99_e2el_ms: Option<f64>,
}

impl BenchResult {
    /// A run with very few completed requests says little about the
    /// endpoint. Requires at least 10 completions and at least half of the
    /// dispatched prompts, when the file records them.
    pub fn is_reliable(&self) -> bool {
        let Some(completed) = self.completed else {
            return true;
        };
        if completed < 10 {
            return false;
        }
        match self.num_prompts {
            Some(total) if total > 0 => completed * 2 >= total,
            _ => true,
        }
    }
}

/// One result file with its concurrency level resolved.
#[derive(Debug, Clone)]
pub struct LoadedResult {
    pub concurrency: u64,
    pub result: BenchResult,
}

/// Extract the concurrency level from a `baseten_conc<N>_<timestamp>` file
/// stem, for result files whose JSON does not record it.
pub fn concurrency_from_filename(stem: &str) -> Option<u64> {
    let idx = stem.find("conc")?;
    let digits: String = stem[idx + "conc".len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Load every result file in a sweep directory, sorted by concurrency.
///
/// Files that cannot be read or parsed, and files whose concurrency cannot
/// be determined, are skipped with a warning so a sweep with failed levels
/// still summarises.
pub fn load_results(results_dir: &Path) -> Result<Vec<LoadedResult>, BenchError> {
    let mut results = Vec::new();

    for entry in fs::read_dir(results_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("Could not read {}: {}", path.display(), err);
                continue;
            }
        };
        let result: BenchResult = match serde_json::from_str(&contents) {
            Ok(result) => result,
            Err(err) => {
                warn!("Could not parse {}: {}", path.display(), err);
                continue;
            }
        };

        let from_filename = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(concurrency_from_filename);
        let Some(concurrency) = result.max_concurrency.or(from_filename) else {
            warn!(
                "Skipping {}: concurrency not recorded in file or filename",
                path.display()
            );
            continue;
        };

        results.push(LoadedResult {
            concurrency,
            result,
        });
    }

    results.sort_by_key(|r| r.concurrency);
    Ok(results)
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Conc")]
    concurrency: u64,
    #[tabled(rename = "Req/s")]
    request_throughput: String,
    #[tabled(rename = "Out tok/s")]
    output_throughput: String,
    #[tabled(rename = "TTFT ms (mean/p50/p99)")]
    ttft: String,
    #[tabled(rename = "TPOT ms (mean/p50/p99)")]
    tpot: String,
    #[tabled(rename = "ITL ms (mean/p50/p99)")]
    itl: String,
    #[tabled(rename = "E2EL ms (mean/p50/p99)")]
    e2el: String,
    #[tabled(rename = "Note")]
    note: String,
}

fn float2(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn percentiles(mean: Option<f64>, median: Option<f64>, p99: Option<f64>) -> String {
    format!("{} / {} / {}", float2(mean), float2(median), float2(p99))
}

/// Render loaded results as a table, one row per concurrency level.
pub fn render_table(results: &[LoadedResult]) -> String {
    let rows: Vec<SummaryRow> = results
        .iter()
        .map(|loaded| {
            let r = &loaded.result;
            SummaryRow {
                concurrency: loaded.concurrency,
                request_throughput: float2(r.request_throughput),
                output_throughput: float2(r.output_throughput),
                ttft: percentiles(r.mean_ttft_ms, r.median_ttft_ms, r.p99_ttft_ms),
                tpot: percentiles(r.mean_tpot_ms, r.median_tpot_ms, r.p99_tpot_ms),
                itl: percentiles(r.mean_itl_ms, r.median_itl_ms, r.p99_itl_ms),
                e2el: percentiles(r.mean_e2el_ms, r.median_e2el_ms, r.p99_e2el_ms),
                note: if r.is_reliable() {
                    String::new()
                } else {
                    "unreliable".to_string()
                },
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

/// Summarise a sweep results directory. Errors if the directory yields no
/// usable result at all.
pub fn summarize_dir(results_dir: &Path) -> Result<String, BenchError> {
    let results = load_results(results_dir)?;
    if results.is_empty() {
        return Err(BenchError::Config(format!(
            "No usable benchmark results found in {}",
            results_dir.display()
        )));
    }
    Ok(render_table(&results))
}
