//! Single benchmark run against a hosted endpoint.
//!
//! All configuration comes from the environment (see [`Config`]); the
//! binary takes no positional arguments and propagates the load
//! generator's exit status.

use baseten_bench::{runner, Config};
use tracing::error;

#[tokio::main]
async fn main() {
    // Validates endpoint and authentication up front; exits 1 with a
    // descriptive message before any subprocess or directory side effect.
    let config = Config::parse_args();

    if let Err(err) = runner::run_once(&config).await {
        error!("{}", err);
        std::process::exit(err.exit_code());
    }
}
