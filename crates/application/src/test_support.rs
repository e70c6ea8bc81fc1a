//! Fakes shared by the unit tests of this crate.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kpi_check_domain::{Assertion, AssertionResult, RequestSpec, ResponseSpec, TestResults, TestSuite};
use serde_json::Value;

use crate::ports::{HttpClient, HttpClientError, ResponseVerifier};
use crate::session::{KpiSession, SessionConfig};

pub const BASE_URL: &str = "http://kpi.test/api";

/// Answers every request with the same status and body, recording each
/// request as `"METHOD url"`.
pub struct FixedClient {
    status: u16,
    body: String,
    pub requests: Mutex<Vec<String>>,
}

impl FixedClient {
    pub fn new(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl Default for FixedClient {
    fn default() -> Self {
        Self::new(200, &serde_json::json!({}))
    }
}

impl HttpClient for FixedClient {
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>> {
        let line = match request.full_url(BASE_URL) {
            Ok(url) => format!("{} {}", request.method, url.as_str()),
            Err(_) => request.describe(),
        };
        self.requests.lock().unwrap().push(line);
        let response = ResponseSpec::new(self.status, self.body.as_bytes().to_vec(), Duration::ZERO);
        Box::pin(async move { Ok(response) })
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }
}

/// Passes every assertion.
pub struct PassingVerifier;

impl ResponseVerifier for PassingVerifier {
    fn verify(&self, suite: &TestSuite, _response: &ResponseSpec) -> TestResults {
        let results = suite
            .assertions
            .iter()
            .cloned()
            .map(AssertionResult::pass)
            .collect();
        TestResults::new(&suite.name, results)
    }
}

/// Fails status assertions that do not match and passes everything else.
pub struct StatusOnlyVerifier;

impl ResponseVerifier for StatusOnlyVerifier {
    fn verify(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let results = suite
            .assertions
            .iter()
            .map(|a| match a {
                Assertion::StatusCode { expected } if *expected != response.status => {
                    AssertionResult::fail(a.clone(), "status mismatch")
                }
                _ => AssertionResult::pass(a.clone()),
            })
            .collect();
        TestResults::new(&suite.name, results)
    }
}

/// Fails every JSON equality assertion and passes everything else.
pub struct MismatchVerifier;

impl ResponseVerifier for MismatchVerifier {
    fn verify(&self, suite: &TestSuite, _response: &ResponseSpec) -> TestResults {
        let results = suite
            .assertions
            .iter()
            .map(|a| match a {
                Assertion::JsonPath {
                    expected: Some(_), ..
                } => AssertionResult::fail(a.clone(), "value mismatch"),
                _ => AssertionResult::pass(a.clone()),
            })
            .collect();
        TestResults::new(&suite.name, results)
    }
}

/// A session on 2025-06-03 talking to `client`.
pub fn session(client: Arc<FixedClient>, verifier: impl ResponseVerifier + 'static) -> KpiSession {
    let date = kpi_check_domain::parse_date("2025-06-03").unwrap();
    KpiSession::new(client, Arc::new(verifier), SessionConfig::new(date))
}
