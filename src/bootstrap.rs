//! # Dependency Bootstrap
//!
//! Prepares the environment the external load generator needs: the Python
//! dataset libraries it imports and a local checkout of the tool itself.
//! Both steps are idempotent and safe to invoke before every run.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::BenchError;

/// Canonical source of the benchmark tool.
pub const BENCH_TOOL_REPO: &str = "https://github.com/vllm-project/vllm.git";

/// Location of the serving benchmark script inside the checkout.
pub const BENCH_SCRIPT: &str = "benchmarks/benchmark_serving.py";

/// Locate the Python interpreter used for probing, installing, and running
/// the load generator.
pub fn python_path() -> Result<PathBuf, BenchError> {
    which::which("python3").map_err(|err| {
        BenchError::Bootstrap(format!(
            "python3 not found in PATH: {}. A Python interpreter is required to run the benchmark tool.",
            err
        ))
    })
}

/// Probe for the dataset library the load generator imports; install it
/// together with pandas when missing.
///
/// The install is best-effort: a failed install is logged and execution
/// proceeds, letting the tool itself surface the real failure.
pub async fn ensure_python_deps() -> Result<(), BenchError> {
    let python = python_path()?;

    let probe = Command::new(&python)
        .args(["-c", "import datasets"])
        .output()
        .await?;
    if probe.status.success() {
        debug!("datasets library already importable");
        return Ok(());
    }

    info!("datasets library not importable, installing datasets and pandas");
    let install = Command::new(&python)
        .args(["-m", "pip", "install", "datasets", "pandas"])
        .status()
        .await?;
    if !install.success() {
        warn!(
            "pip install of datasets/pandas exited with {}, continuing anyway",
            install
        );
    }

    Ok(())
}

/// Make sure a local checkout of the benchmark tool exists, cloning it from
/// the canonical repository on first use.
///
/// Returns the path to the serving benchmark script.
pub async fn ensure_bench_tool(tool_dir: &Path) -> Result<PathBuf, BenchError> {
    let script = tool_dir.join(BENCH_SCRIPT);
    if script.exists() {
        debug!("Benchmark tool already present at {}", script.display());
        return Ok(script);
    }

    let git = which::which("git").map_err(|err| {
        BenchError::Bootstrap(format!(
            "git not found in PATH: {}. git is required to fetch the benchmark tool.",
            err
        ))
    })?;

    info!(
        "Cloning benchmark tool from {} into {}",
        BENCH_TOOL_REPO,
        tool_dir.display()
    );
    let status = Command::new(git)
        .args(["clone", "--depth", "1", BENCH_TOOL_REPO])
        .arg(tool_dir)
        .status()
        .await?;
    if !status.success() {
        return Err(BenchError::Bootstrap(format!(
            "git clone of {} exited with {}",
            BENCH_TOOL_REPO, status
        )));
    }

    if !script.exists() {
        return Err(BenchError::Bootstrap(format!(
            "Benchmark script missing after clone: {}",
            script.display()
        )));
    }

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_existing_checkout_is_reused_without_cloning() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let tool_dir = temp.path().join("vllm");
        let script = tool_dir.join(BENCH_SCRIPT);
        std::fs::create_dir_all(script.parent().unwrap()).expect("failed to create benchmarks dir");
        std::fs::write(&script, "# stub").expect("failed to write stub script");

        let resolved = ensure_bench_tool(&tool_dir)
            .await
            .expect("existing checkout should be accepted");
        assert_eq!(resolved, script);
    }

    #[test]
    fn test_script_path_is_relative_to_tool_dir() {
        let script = Path::new("workdir/vllm").join(BENCH_SCRIPT);
        assert_eq!(
            script,
            PathBuf::from("workdir/vllm/benchmarks/benchmark_serving.py")
        );
    }
}
