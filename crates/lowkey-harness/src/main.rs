//! LowKey API harness entry point
//!
//! Run with:
//! ```bash
//! cargo run -p lowkey-harness
//! ```
//!
//! Targets the compiled-in preview deployment unless `LOWKEY_BASE_URL`
//! (environment or `.env`) points elsewhere. Exits non-zero if any case
//! failed.

use std::process::ExitCode;

use lowkey_common::{try_init_tracing, try_init_tracing_with_config, HarnessConfig, TracingConfig};
use lowkey_harness::{Orchestrator, TestContext};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            error!(error = %e, "Failed to load configuration");
            return ExitCode::from(2);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_harness(&config)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let ctx = match TestContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "Failed to set up test context");
            return ExitCode::from(2);
        }
    };

    let report = Orchestrator::new(ctx).run().await;

    // Printed directly: the summary must survive RUST_LOG and a failed
    // subscriber install
    println!("{}", report.render());

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
