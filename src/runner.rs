//! # Single-Run Driver
//!
//! Executes exactly one benchmark run against a configured endpoint and
//! produces one result file. The sequence is linear: validate and resolve
//! configuration, bootstrap dependencies, invoke the load generator as a
//! subprocess, propagate its exit status.

use std::path::PathBuf;

use tokio::process::Command;
use tracing::{debug, info};

use crate::bootstrap;
use crate::config::Config;
use crate::endpoint::{self, Backend};
use crate::error::BenchError;

/// A fully resolved benchmark invocation.
///
/// Built up front from [`Config`] so every configuration failure surfaces
/// before any side effect (package install, clone, or network call).
#[derive(Debug, Clone)]
pub struct BenchInvocation {
    pub base_url: String,
    pub backend: Backend,
    pub endpoint_path: String,
    pub api_key: String,
    pub model: String,
    pub tokenizer: String,
    pub input_len: u32,
    pub output_len: u32,
    pub random_range_ratio: f64,
    pub concurrency: u64,
    pub num_prompts: u64,
    pub result_dir: PathBuf,
    pub result_filename: String,
}

impl BenchInvocation {
    pub fn from_config(config: &Config) -> Result<Self, BenchError> {
        let (base_url, backend) = endpoint::resolve_base_url(config)?;
        let api_key = config.require_api_key()?;
        let endpoint_path = endpoint::chat_endpoint_path(&base_url);
        // The hosted endpoint serves chat completions, so the generic
        // selector is always narrowed before the tool is launched.
        let backend = backend.narrow_to_chat();

        Ok(Self {
            base_url,
            backend,
            endpoint_path,
            api_key,
            model: config.model.clone(),
            tokenizer: config.tokenizer.clone(),
            input_len: config.input_len,
            output_len: config.output_len,
            random_range_ratio: config.random_range_ratio,
            concurrency: config.concurrency,
            num_prompts: config.effective_num_prompts(),
            result_dir: config.result_dir.clone(),
            result_filename: config.result_filename.clone(),
        })
    }

    /// The fixed argument vector handed to the serving benchmark script.
    ///
    /// `--request-rate inf` dispatches all prompts without artificial pacing
    /// beyond the concurrency cap; `--ignore-eos` forces generation to the
    /// full requested output length instead of stopping at an end-of-sequence
    /// token.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--backend".to_string(),
            self.backend.as_str().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--tokenizer".to_string(),
            self.tokenizer.clone(),
            "--base-url".to_string(),
            self.base_url.clone(),
            "--endpoint".to_string(),
            self.endpoint_path.clone(),
            "--dataset-name".to_string(),
            "random".to_string(),
            "--random-input-len".to_string(),
            self.input_len.to_string(),
            "--random-output-len".to_string(),
            self.output_len.to_string(),
            "--random-range-ratio".to_string(),
            self.random_range_ratio.to_string(),
            "--num-prompts".to_string(),
            self.num_prompts.to_string(),
            "--max-concurrency".to_string(),
            self.concurrency.to_string(),
            "--request-rate".to_string(),
            "inf".to_string(),
            "--ignore-eos".to_string(),
            "--save-result".to_string(),
            "--percentile-metrics".to_string(),
            "ttft,tpot,itl,e2el".to_string(),
            "--result-dir".to_string(),
            self.result_dir.display().to_string(),
            "--result-filename".to_string(),
            self.result_filename.clone(),
        ]
    }

    /// Where the load generator will write this run's result file.
    pub fn result_path(&self) -> PathBuf {
        self.result_dir.join(&self.result_filename)
    }
}

/// Run one benchmark against the configured endpoint.
///
/// Returns the path of the result file on success. A non-zero exit from the
/// load generator becomes [`BenchError::BenchmarkFailed`] carrying its exit
/// status; there are no retries and partial result files are left in place.
pub async fn run_once(config: &Config) -> Result<PathBuf, BenchError> {
    let invocation = BenchInvocation::from_config(config)?;

    info!(
        "Target: {}{} (backend {})",
        invocation.base_url, invocation.endpoint_path, invocation.backend
    );
    info!(
        "Model {} | ISL {} | OSL {} | range ratio {} | concurrency {} | prompts {}",
        invocation.model,
        invocation.input_len,
        invocation.output_len,
        invocation.random_range_ratio,
        invocation.concurrency,
        invocation.num_prompts
    );

    bootstrap::ensure_python_deps().await?;
    let script = bootstrap::ensure_bench_tool(&config.tool_dir).await?;
    let python = bootstrap::python_path()?;

    debug!("Launching {} {}", script.display(), invocation.args().join(" "));
    let status = Command::new(python)
        .arg(&script)
        .args(invocation.args())
        // The downstream OpenAI-compatible client reads its key from the
        // generic variable name, whichever variable supplied it here.
        .env("OPENAI_API_KEY", &invocation.api_key)
        .status()
        .await?;

    if !status.success() {
        return Err(BenchError::BenchmarkFailed {
            status: status.code().unwrap_or(1),
        });
    }

    let result_path = invocation.result_path();
    info!("Benchmark complete, results saved to {}", result_path.display());
    Ok(result_path)
}
