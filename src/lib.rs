//! # baseten_bench - Baseten Serving Benchmark Harness
//!
//! Orchestrates an external load generator (vLLM's `benchmark_serving.py`)
//! against a Baseten-hosted, OpenAI-compatible LLM inference endpoint. The
//! harness itself issues no requests: it validates configuration, resolves
//! the endpoint and authentication, bootstraps the tool and its Python
//! dependencies, and invokes it as a subprocess with a fixed flag set,
//! collecting latency-percentile results into timestamped JSON files.
//!
//! ## Binaries
//!
//! - `bench-run` - one benchmark run at the configured concurrency
//! - `bench-sweep` - runs across a fixed ladder of concurrency levels with
//!   rate-limit cool-downs between runs, continuing past failed levels
//! - `bench-summary` - renders a latency/throughput table for a sweep's
//!   results directory
//!
//! ## Architecture
//!
//! - [`config`] - environment-backed configuration with CLI overrides
//! - [`endpoint`] - endpoint resolution and chat completions path handling
//! - [`bootstrap`] - idempotent tool checkout and Python dependency setup
//! - [`runner`] - the single-run driver
//! - [`sweep`] - the concurrency sweep driver
//! - [`summary`] - read-only results summarisation
//! - [`error`] - custom error types and handling

pub mod bootstrap;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod runner;
pub mod summary;
pub mod sweep;

// Re-export commonly used types for convenience
pub use config::Config;
pub use endpoint::Backend;
pub use error::BenchError;
pub use runner::BenchInvocation;
pub use sweep::{RunSpec, SweepOutcome, SweepPlan};

/// The result type used throughout the library
pub type Result<T> = std::result::Result<T, BenchError>;
