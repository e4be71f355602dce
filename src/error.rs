use thiserror::Error;

/// Errors surfaced by the benchmark drivers.
///
/// Configuration and authentication problems are separate variants so the
/// operator can tell a missing endpoint apart from a missing key; both are
/// fatal before any subprocess is spawned or directory created.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Bootstrap error: {0}")]
    Bootstrap(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Benchmark run exited with status {status}")]
    BenchmarkFailed { status: i32 },
}

impl BenchError {
    /// Process exit code the binaries report for this error.
    ///
    /// A failed benchmark propagates the subprocess's own exit status;
    /// everything else exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::BenchmarkFailed { status } => *status,
            _ => 1,
        }
    }
}
