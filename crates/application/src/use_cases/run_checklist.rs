//! Run checklist use case

use std::time::Instant;

use kpi_check_domain::period::DATE_FORMAT;
use kpi_check_domain::{Assertion, CheckOutcome, RequestSpec, RunSummary};

use crate::checks::Check;
use crate::session::KpiSession;

/// Runs checks one after another and collects their outcomes.
///
/// A failing check never stops the run. Once every check has run, records
/// the checks left on the server are deleted and the fixture entry's calls
/// count is restored, unless teardown is disabled.
pub struct RunChecklist {
    checks: Vec<Box<dyn Check>>,
    teardown: bool,
}

impl RunChecklist {
    /// Creates a runner for `checks` with teardown enabled.
    #[must_use]
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self {
            checks,
            teardown: true,
        }
    }

    /// Enables or disables teardown (builder pattern).
    #[must_use]
    pub const fn with_teardown(mut self, teardown: bool) -> Self {
        self.teardown = teardown;
        self
    }

    /// Executes the use case.
    ///
    /// Never fails: errors raised by a check become failed outcomes and
    /// teardown problems are logged as warnings.
    pub async fn execute(&self, session: &mut KpiSession) -> RunSummary {
        tracing::info!("Starting KPI Tracker Backend API Tests...");
        tracing::info!("Base URL: {}", session.base_url());
        tracing::info!("Test Date: {}", session.test_date_str());

        let mut outcomes = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            let name = check.name();
            tracing::info!("--- Running {name} Tests ---");

            let started = Instant::now();
            let outcome = match check.run(session).await {
                Ok(()) => CheckOutcome::passed(name, started.elapsed()),
                Err(e) => {
                    tracing::error!("❌ {name} failed: {e}");
                    CheckOutcome::failed(name, e.to_string(), started.elapsed())
                }
            };
            outcomes.push(outcome);
        }

        if self.teardown {
            teardown(session).await;
        } else if !session.ledger().pending().is_empty() {
            tracing::info!(
                pending = session.ledger().pending().len(),
                "teardown skipped, fixtures left in place"
            );
        }

        let summary = RunSummary::new(outcomes);
        log_summary(&summary);
        summary
    }
}

async fn teardown(session: &mut KpiSession) {
    for record in session.ledger_mut().drain() {
        match session
            .delete_record_on(record.date, record.kind, &record.id)
            .await
        {
            Ok(()) => tracing::debug!(kind = record.kind.label(), id = %record.id, "fixture removed"),
            Err(e) => tracing::warn!(
                kind = record.kind.label(),
                id = %record.id,
                error = %e,
                "could not remove fixture"
            ),
        }
    }

    if let Some((date, calls)) = session.ledger_mut().take_original_calls() {
        let request = RequestSpec::put(format!("/entries/{}/calls", date.format(DATE_FORMAT)))
            .with_query("calls_received", calls);
        match session.check(&request, [Assertion::status(200)]).await {
            Ok(_) => tracing::debug!(calls, "calls count restored"),
            Err(e) => tracing::warn!(error = %e, "could not restore calls count"),
        }
    }
}

fn log_summary(summary: &RunSummary) {
    tracing::info!("=== TEST RESULTS ===");
    tracing::info!("✅ Passed: {}", summary.passed());
    tracing::info!("❌ Failed: {}", summary.failed());
    tracing::info!("Total: {}", summary.total());
    if summary.all_passed() {
        tracing::info!("🎉 All tests passed!");
    } else {
        tracing::error!("💥 Some tests failed!");
    }
}
