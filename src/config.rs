#[cfg(feature = "cli")]
use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::error::BenchError;

/// # Benchmark Configuration
///
/// Every parameter of a benchmark run, sourced from environment variables
/// (with command-line overrides) so the drivers take no positional
/// arguments. Defaults match the hosted gpt-oss deployment the harness was
/// built for.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "baseten-bench"))]
#[cfg_attr(feature = "cli", command(about = "Run serving benchmarks against a Baseten-hosted OpenAI-compatible LLM endpoint"))]
#[cfg_attr(feature = "cli", command(version))]
pub struct Config {
    // =============================================================================
    // ENDPOINT AND AUTHENTICATION
    // =============================================================================

    /// OpenAI-compatible base URL of the deployment
    #[cfg_attr(feature = "cli", arg(long, env = "BASETEN_BASE_URL"))]
    pub base_url: Option<String>,

    /// Direct endpoint URL, used when no base URL is set
    #[cfg_attr(feature = "cli", arg(long, env = "BASETEN_API_URL"))]
    pub api_url: Option<String>,

    /// API key for the hosted endpoint
    #[cfg_attr(feature = "cli", arg(long, env = "BASETEN_API_KEY"))]
    pub api_key: Option<String>,

    /// Fallback API key; also the variable name the key is exported under
    /// for the downstream OpenAI-compatible client
    #[cfg_attr(feature = "cli", arg(long, env = "OPENAI_API_KEY"))]
    pub openai_api_key: Option<String>,

    // =============================================================================
    // WORKLOAD SHAPE
    // =============================================================================

    /// Model identifier sent with every request
    #[cfg_attr(feature = "cli", arg(long, env = "MODEL", default_value = "openai/gpt-oss-120b"))]
    pub model: String,

    /// Tokenizer the load generator uses to size prompts, independently
    /// overridable from the API model string
    #[cfg_attr(feature = "cli", arg(long, env = "TOKENIZER", default_value = "openai/gpt-oss-120b"))]
    pub tokenizer: String,

    /// Input sequence length in tokens
    #[cfg_attr(feature = "cli", arg(long, env = "ISL", default_value = "1024"))]
    pub input_len: u32,

    /// Output sequence length in tokens
    #[cfg_attr(feature = "cli", arg(long, env = "OSL", default_value = "1024"))]
    pub output_len: u32,

    /// Ratio controlling how far sampled sequence lengths may range below ISL/OSL
    #[cfg_attr(feature = "cli", arg(long, env = "RANDOM_RANGE_RATIO", default_value = "0.0"))]
    pub random_range_ratio: f64,

    /// Maximum number of simultaneous in-flight requests
    #[cfg_attr(feature = "cli", arg(long, env = "CONC", default_value = "1"))]
    pub concurrency: u64,

    /// Number of prompts to dispatch; defaults to concurrency * 10
    #[cfg_attr(feature = "cli", arg(long, env = "NUM_PROMPTS"))]
    pub num_prompts: Option<u64>,

    // =============================================================================
    // ARTIFACTS AND TOOLING
    // =============================================================================

    /// Result file written by the load generator
    #[cfg_attr(feature = "cli", arg(long, env = "RESULT_FILENAME", default_value = "baseten_gptoss_benchmark.json"))]
    pub result_filename: String,

    /// Directory the result file is written into
    #[cfg_attr(feature = "cli", arg(long, env = "RESULT_DIR", default_value = "."))]
    pub result_dir: PathBuf,

    /// Location of the benchmark tool checkout, cloned on first use
    #[cfg_attr(feature = "cli", arg(long, env = "VLLM_DIR", default_value = "vllm"))]
    pub tool_dir: PathBuf,

    // =============================================================================
    // LOGGING
    // =============================================================================

    /// Log level (error, warn, info, debug, trace)
    #[cfg_attr(feature = "cli", arg(long, env = "RUST_LOG", default_value = "info"))]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from command line arguments and environment variables.
    ///
    /// This method:
    /// 1. Loads environment variables from .env file if it exists
    /// 2. Parses command line arguments
    /// 3. Sets up logging
    /// 4. Validates configuration, exiting 1 with a descriptive message
    ///    before any subprocess is spawned or directory created
    #[cfg(feature = "cli")]
    pub fn parse_args() -> Self {
        // Load .env file if it exists (ignore errors if file doesn't exist)
        let _ = dotenv::dotenv();

        let config = Self::parse();

        config.setup_logging();

        if let Err(err) = config.validate() {
            eprintln!("Configuration validation failed: {}", err);
            std::process::exit(1);
        }

        config
    }

    /// Create a test configuration with minimal required fields.
    /// This is used for testing purposes only.
    pub fn for_test() -> Self {
        Self {
            base_url: Some("http://localhost:8000".to_string()),
            api_url: None,
            api_key: Some("test-key".to_string()),
            openai_api_key: None,
            model: "openai/gpt-oss-120b".to_string(),
            tokenizer: "openai/gpt-oss-120b".to_string(),
            input_len: 1024,
            output_len: 1024,
            random_range_ratio: 0.0,
            concurrency: 1,
            num_prompts: None,
            result_filename: "baseten_gptoss_benchmark.json".to_string(),
            result_dir: PathBuf::from("."),
            tool_dir: PathBuf::from("vllm"),
            log_level: "info".to_string(),
        }
    }

    /// Set up the tracing subscriber with the configured log level.
    #[cfg(feature = "cli")]
    fn setup_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_level.clone())
            .with_target(false)
            .try_init();
    }

    /// Validate configuration values and provide helpful error messages.
    ///
    /// Endpoint and authentication checks run first so their failures are
    /// reported before anything else and with distinct messages.
    pub fn validate(&self) -> Result<(), String> {
        let (base_url, _) = crate::endpoint::resolve_base_url(self).map_err(|e| e.to_string())?;

        match Url::parse(&base_url) {
            Ok(url) => {
                if !["http", "https"].contains(&url.scheme()) {
                    return Err(format!(
                        "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
                        url.scheme()
                    ));
                }
                if url.host().is_none() {
                    return Err(
                        "Endpoint URL must include a host (e.g., 'https://model-x.api.baseten.co/environments/production/sync')."
                            .to_string(),
                    );
                }
            }
            Err(err) => {
                return Err(format!(
                    "Invalid endpoint URL format '{}': {}. Please provide a valid URL.",
                    base_url, err
                ));
            }
        }

        self.require_api_key().map_err(|e| e.to_string())?;

        if self.model.is_empty() {
            return Err("Model cannot be empty. Please specify a valid model identifier.".to_string());
        }
        if self.tokenizer.is_empty() {
            return Err("Tokenizer cannot be empty. Please specify a valid tokenizer name.".to_string());
        }

        if self.input_len == 0 {
            return Err("Input sequence length (ISL) must be greater than 0 tokens.".to_string());
        }
        if self.output_len == 0 {
            return Err("Output sequence length (OSL) must be greater than 0 tokens.".to_string());
        }

        if !(0.0..=1.0).contains(&self.random_range_ratio) {
            return Err(format!(
                "Random range ratio {} is out of range. Provide a value between 0.0 and 1.0.",
                self.random_range_ratio
            ));
        }

        if self.concurrency == 0 {
            return Err("Concurrency (CONC) must be greater than 0.".to_string());
        }
        if self.num_prompts == Some(0) {
            return Err("Number of prompts (NUM_PROMPTS) must be greater than 0.".to_string());
        }

        if self.result_filename.is_empty() {
            return Err("Result filename cannot be empty.".to_string());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Valid options are: {}",
                self.log_level,
                valid_log_levels.join(", ")
            ));
        }

        Ok(())
    }

    /// Get the effective API key, checking multiple sources.
    ///
    /// This method checks for keys in the following order:
    /// 1. Explicitly provided BASETEN_API_KEY
    /// 2. Generic OPENAI_API_KEY
    /// 3. None (no authentication available)
    pub fn resolve_api_key(&self) -> Option<String> {
        non_empty(&self.api_key).or_else(|| non_empty(&self.openai_api_key))
    }

    /// Like [`Config::resolve_api_key`], but a missing key is an
    /// authentication error. The hosted endpoints always require a key,
    /// unlike the local test servers the load generator was built around.
    pub fn require_api_key(&self) -> Result<String, BenchError> {
        self.resolve_api_key().ok_or_else(|| {
            BenchError::Auth(
                "No API key configured. Set BASETEN_API_KEY (or OPENAI_API_KEY) to \
                 authenticate against the hosted endpoint."
                    .to_string(),
            )
        })
    }

    /// Number of prompts for this run: the explicit NUM_PROMPTS override,
    /// or concurrency * 10.
    pub fn effective_num_prompts(&self) -> u64 {
        self.num_prompts
            .unwrap_or(self.concurrency * crate::sweep::PROMPTS_PER_CONCURRENCY)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
