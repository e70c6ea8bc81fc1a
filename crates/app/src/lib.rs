//! KPI Check - wiring of the checklist binaries.
//!
//! Connects the reqwest transport and the assertion runner to the checklist
//! use case and installs the log subscriber.

use std::sync::Arc;

use kpi_check_application::ports::HttpClientError;
use kpi_check_application::{KpiSession, RunChecklist, SessionConfig, Settings, standard_checklist};
use kpi_check_domain::RunSummary;
use kpi_check_infrastructure::{ReqwestHttpClient, TestRunner};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the `tracing` subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Runs the standard checklist with `settings`.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built. Check failures
/// are reported in the summary.
pub async fn run(settings: &Settings) -> Result<RunSummary, HttpClientError> {
    let client = ReqwestHttpClient::new(settings.base_url.clone())?;
    let mut session = KpiSession::new(
        Arc::new(client),
        Arc::new(TestRunner::new()),
        SessionConfig::new(settings.test_date),
    );

    let summary = RunChecklist::new(standard_checklist())
        .with_teardown(!settings.skip_teardown)
        .execute(&mut session)
        .await;
    Ok(summary)
}
