//! Main entry point for the SEOForge backend.
//!
//! Installs the tracing subscriber and runs the server until it is asked to
//! shut down.

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match seoforge_backend::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Server failed: {err}");
            ExitCode::FAILURE
        }
    }
}
