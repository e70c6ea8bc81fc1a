//! Response verification port

use kpi_check_domain::{ResponseSpec, TestResults, TestSuite};

/// Evaluates a suite of assertions against a response.
pub trait ResponseVerifier: Send + Sync {
    /// Runs every assertion of `suite` (honouring its stop-on-failure flag).
    fn verify(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults;
}
