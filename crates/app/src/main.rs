//! KPI Tracker API checklist - Main Entry Point
//!
//! Runs every check against the configured API and exits with 0 when all
//! of them passed, 1 otherwise.

use std::process::ExitCode;

use kpi_check_infrastructure::{SystemClock, settings_from_env};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    kpi_check::init_tracing();

    let settings = match settings_from_env(&SystemClock::new()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match kpi_check::run(&settings).await {
        Ok(summary) if summary.all_passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("could not create HTTP client: {e}");
            ExitCode::FAILURE
        }
    }
}
