//! Standalone check of the reset-password endpoint
//!
//! Sends one reset request with a fabricated token and checks the API
//! rejects it. Useful for reproducing reset-password issues without running
//! the whole suite.

use std::process::ExitCode;

use lowkey_common::{try_init_tracing_with_config, HarnessConfig, TracingConfig};
use lowkey_harness::cases::auth::{check_reset_rejection, reset_password_with_fabricated_token};
use lowkey_harness::ApiClient;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_harness(&config)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let client = match ApiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::from(2);
        }
    };

    info!(base_url = %client.base_url(), "Making request...");
    let response = match reset_password_with_fabricated_token(&client).await {
        Ok(response) => response,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "❌ Request failed");
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Printed directly so the answer shows whatever the log filter says
    println!("Status Code: {}", response.status.as_u16());
    println!("Response: {}", response.body);

    match check_reset_rejection(&response) {
        Ok(()) => {
            info!("✅ Reset password API working correctly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "❌ Unexpected response");
            ExitCode::FAILURE
        }
    }
}
