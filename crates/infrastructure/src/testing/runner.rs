//! Test runner implementation.
//!
//! Executes assertions against HTTP responses and produces test results.

use kpi_check_application::ports::ResponseVerifier;
use kpi_check_domain::testing::{
    Assertion, AssertionResult, ComparisonOperator, JsonKind, TestResults, TestSuite,
};
use kpi_check_domain::{ResponseSpec, StatusCode, is_truthy, parse_date};
use serde_json::Value;

/// Test runner that executes assertions against responses.
///
/// Whether evaluation stops at the first failure is decided by each suite.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a test suite against a response.
    #[must_use]
    pub fn run(suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let mut results = Vec::with_capacity(suite.assertions.len());

        for assertion in &suite.assertions {
            let result = Self::run_assertion(assertion, response);
            let failed = !result.passed;
            results.push(result);

            if failed && suite.stop_on_failure {
                break;
            }
        }

        TestResults::new(&suite.name, results)
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => {
                Self::check_status_code(assertion, response, *expected)
            }
            Assertion::IsJson => Self::check_is_json(assertion, response),
            Assertion::JsonPath { path, expected } => {
                Self::with_value(assertion, response, path, |value| {
                    Self::check_json_path(assertion, path, value, expected.as_ref())
                })
            }
            Assertion::JsonPathMatches {
                path,
                operator,
                value: expected,
            } => Self::with_value(assertion, response, path, |value| {
                Self::check_json_path_matches(assertion, path, value, *operator, expected)
            }),
            Assertion::RequiredFields { path, fields } => {
                Self::with_value(assertion, response, path, |value| {
                    Self::check_required_fields(assertion, path, value, fields)
                })
            }
            Assertion::Truthy { path } => Self::check_truthy(assertion, response, path),
            Assertion::JsonType { path, kind } => {
                Self::with_value(assertion, response, path, |value| {
                    Self::check_json_type(assertion, path, value, *kind)
                })
            }
            Assertion::IsoDate { path } => Self::with_value(assertion, response, path, |value| {
                Self::check_iso_date(assertion, path, value)
            }),
        }
    }

    fn check_status_code(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: u16,
    ) -> AssertionResult {
        let actual = StatusCode(response.status);
        if actual.0 == expected {
            AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("Expected status {expected}, got {actual}"),
            )
        }
    }

    fn check_is_json(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(_) => AssertionResult::pass(assertion.clone()),
            Err(e) => AssertionResult::fail(assertion.clone(), format!("Body is not valid JSON: {e}")),
        }
    }

    /// Parses the body, resolves `path` and hands the value to `check`.
    ///
    /// Unparseable bodies, invalid paths and missing values fail here.
    fn with_value<F>(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        check: F,
    ) -> AssertionResult
    where
        F: FnOnce(&Value) -> AssertionResult,
    {
        let json = match serde_json::from_str::<Value>(&response.body) {
            Ok(json) => json,
            Err(e) => {
                return AssertionResult::fail(
                    assertion.clone(),
                    format!("Failed to parse body as JSON: {e}"),
                );
            }
        };

        match query_json_path(&json, path) {
            Ok(Some(value)) => check(&value),
            Ok(None) => {
                AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found"))
            }
            Err(e) => {
                AssertionResult::fail(assertion.clone(), format!("Invalid JSON path '{path}': {e}"))
            }
        }
    }

    fn check_json_path(
        assertion: &Assertion,
        path: &str,
        value: &Value,
        expected: Option<&Value>,
    ) -> AssertionResult {
        match expected {
            Some(expected) if !json_equals(value, expected) => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' value mismatch: expected {expected}, got {value}"),
            ),
            _ => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
        }
    }

    fn check_json_path_matches(
        assertion: &Assertion,
        path: &str,
        value: &Value,
        operator: ComparisonOperator,
        expected: &Value,
    ) -> AssertionResult {
        if compare_json_values(value, operator, expected) {
            AssertionResult::pass_with_value(assertion.clone(), value.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!(
                    "JSON path '{path}' comparison failed: {value} {} {expected}",
                    operator.symbol()
                ),
            )
        }
    }

    fn check_required_fields(
        assertion: &Assertion,
        path: &str,
        value: &Value,
        fields: &[String],
    ) -> AssertionResult {
        let Some(object) = value.as_object() else {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' is not an object"),
            );
        };

        let missing: Vec<&str> = fields
            .iter()
            .filter(|field| !object.contains_key(field.as_str()))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail(
                assertion.clone(),
                format!("JSON path '{path}' missing fields: [{}]", missing.join(", ")),
            )
        }
    }

    /// Missing values are falsy, so this does not go through `with_value`.
    fn check_truthy(assertion: &Assertion, response: &ResponseSpec, path: &str) -> AssertionResult {
        let json = match serde_json::from_str::<Value>(&response.body) {
            Ok(json) => json,
            Err(e) => {
                return AssertionResult::fail(
                    assertion.clone(),
                    format!("Failed to parse body as JSON: {e}"),
                );
            }
        };

        match query_json_path(&json, path) {
            Ok(Some(value)) if is_truthy(&value) => {
                AssertionResult::pass_with_value(assertion.clone(), value.to_string())
            }
            Ok(Some(value)) => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' is not set (got {value})"),
            ),
            Ok(None) => {
                AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' is not set"))
            }
            Err(e) => {
                AssertionResult::fail(assertion.clone(), format!("Invalid JSON path '{path}': {e}"))
            }
        }
    }

    fn check_json_type(
        assertion: &Assertion,
        path: &str,
        value: &Value,
        kind: JsonKind,
    ) -> AssertionResult {
        let actual = JsonKind::of(value);
        if actual == kind {
            AssertionResult::pass_with_value(assertion.clone(), actual.as_str())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.as_str(),
                format!(
                    "JSON path '{path}' should be {}, got {}",
                    kind.as_str(),
                    actual.as_str()
                ),
            )
        }
    }

    fn check_iso_date(assertion: &Assertion, path: &str, value: &Value) -> AssertionResult {
        match value.as_str().map(parse_date) {
            Some(Ok(_)) => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
            _ => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' is not a YYYY-MM-DD date: {value}"),
            ),
        }
    }
}

impl ResponseVerifier for TestRunner {
    fn verify(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        Self::run(suite, response)
    }
}

/// Query a JSON value using a simple JSONPath-like syntax.
/// Supports: $, $.field, $.field.nested, $.array[0], $.array[-1], $.array[*], $[0]
fn query_json_path(json: &Value, path: &str) -> Result<Option<Value>, String> {
    let path = path.trim();
    let Some(path) = path.strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };
    if path.is_empty() {
        return Ok(Some(json.clone()));
    }

    let path = path.strip_prefix('.').unwrap_or(path);
    let mut current = json;

    for segment in split_path_segments(path) {
        if let Some((name, index)) = parse_array_access(&segment) {
            if !name.is_empty() {
                current = match current.get(name) {
                    Some(v) => v,
                    None => return Ok(None),
                };
            }
            if index == "*" {
                // Whole array
                return Ok(Some(current.clone()));
            }
            let Some(items) = current.as_array() else {
                return Ok(None);
            };
            let idx: isize = index
                .parse()
                .map_err(|_| format!("Invalid array index: {index}"))?;
            let position = if idx < 0 {
                items.len().checked_sub(idx.unsigned_abs())
            } else {
                Some(idx.unsigned_abs())
            };
            current = match position.and_then(|p| items.get(p)) {
                Some(v) => v,
                None => return Ok(None),
            };
        } else {
            current = match current.get(segment.as_str()) {
                Some(v) => v,
                None => return Ok(None),
            };
        }
    }

    Ok(Some(current.clone()))
}

/// Split a path into segments, respecting array brackets.
fn split_path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Parse array access like "field[0]" into ("field", "0").
fn parse_array_access(segment: &str) -> Option<(&str, &str)> {
    let bracket_start = segment.find('[')?;
    let inner = segment[bracket_start + 1..].strip_suffix(']')?;
    Some((&segment[..bracket_start], inner))
}

/// Structural equality where numbers compare by value.
fn json_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON * a.abs().max(b.abs()).max(1.0),
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_equals(x, y)))
        }
        _ => actual == expected,
    }
}

/// Compare two JSON values using the given operator.
fn compare_json_values(actual: &Value, operator: ComparisonOperator, expected: &Value) -> bool {
    match operator {
        ComparisonOperator::Equals => json_equals(actual, expected),
        ComparisonOperator::Contains => match (actual, expected) {
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            (Value::Array(arr), _) => arr.iter().any(|item| json_equals(item, expected)),
            _ => false,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn create_response(status: u16, body: &str) -> ResponseSpec {
        ResponseSpec::new(status, body.as_bytes().to_vec(), Duration::from_millis(50))
    }

    fn passes(assertion: &Assertion, response: &ResponseSpec) -> bool {
        TestRunner::run_assertion(assertion, response).passed
    }

    #[test]
    fn test_status_code_exact() {
        let response = create_response(200, "");

        assert!(passes(&Assertion::status(200), &response));
        assert!(!passes(&Assertion::status(201), &response));
    }

    #[test]
    fn test_status_code_failure_names_reason() {
        let response = create_response(404, r#"{"detail": "Period not found"}"#);

        let result = TestRunner::run_assertion(&Assertion::status(200), &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("404 Not Found"));
        assert_eq!(
            result.error.as_deref(),
            Some("Expected status 200, got 404 Not Found")
        );
    }

    #[test]
    fn test_json_path() {
        let response = create_response(200, r#"{"user": {"id": 123, "name": "John"}}"#);

        assert!(passes(&Assertion::json_eq("$.user.id", json!(123)), &response));
        assert!(passes(&Assertion::exists("$.user.name"), &response));
        assert!(!passes(&Assertion::exists("$.user.missing"), &response));
    }

    #[test]
    fn test_json_path_compares_numbers_by_value() {
        let response = create_response(200, r#"{"calls_daily": 150, "profit_daily": 80}"#);

        assert!(passes(&Assertion::json_eq("$.calls_daily", json!(150.0)), &response));
        assert!(passes(&Assertion::json_eq("$.profit_daily", json!(80.0)), &response));
        assert!(!passes(&Assertion::json_eq("$.calls_daily", json!(151)), &response));
        assert!(!passes(&Assertion::json_eq("$.calls_daily", json!("150")), &response));
    }

    #[test]
    fn test_json_path_with_array() {
        let response = create_response(200, r#"{"items": [{"id": 1}, {"id": 2}, {"id": 3}]}"#);

        assert!(passes(&Assertion::json_eq("$.items[0].id", json!(1)), &response));
        assert!(passes(&Assertion::json_eq("$.items[-1].id", json!(3)), &response));
        assert!(passes(&Assertion::json_eq("$.items[-3].id", json!(1)), &response));
        assert!(!passes(&Assertion::exists("$.items[-4]"), &response));
        assert!(!passes(&Assertion::exists("$.items[3]"), &response));
    }

    #[test]
    fn test_query_root_array() {
        let json = json!([{"period_id": "a"}, {"period_id": "b"}]);
        assert_eq!(query_json_path(&json, "$").unwrap(), Some(json.clone()));
        assert_eq!(
            query_json_path(&json, "$[0].period_id").unwrap(),
            Some(json!("a"))
        );
        assert_eq!(query_json_path(&json, "$[*]").unwrap(), Some(json.clone()));
        assert!(query_json_path(&json, "period_id").is_err());
        assert!(query_json_path(&json, "$[x]").is_err());
    }

    #[test]
    fn test_json_path_matches() {
        let response = create_response(
            200,
            r#"{"count": 10, "period_id": "2025-06-01_to_2025-06-14", "jobs": [{"id": "period_archiver"}]}"#,
        );

        let equals = Assertion::JsonPathMatches {
            path: "$.count".to_string(),
            operator: ComparisonOperator::Equals,
            value: json!(10.0),
        };
        assert!(passes(&equals, &response));

        assert!(passes(&Assertion::contains("$.period_id", json!("_to_")), &response));
        assert!(!passes(&Assertion::contains("$.period_id", json!("2024")), &response));
        assert!(passes(
            &Assertion::contains("$.jobs", json!({"id": "period_archiver"})),
            &response
        ));
        assert!(!passes(&Assertion::contains("$.count", json!(1)), &response));
    }

    #[test]
    fn test_required_fields_reports_every_missing_name() {
        let response = create_response(200, r#"{"calls": {}, "profit": {}}"#);
        let assertion = Assertion::required_fields("$", &["calls", "reservations", "profit", "spins"]);

        let result = TestRunner::run_assertion(&assertion, &response);
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("JSON path '$' missing fields: [reservations, spins]")
        );
    }

    #[test]
    fn test_required_fields_on_non_object() {
        let response = create_response(200, "[]");
        let assertion = Assertion::required_fields("$", &["period_id"]);
        assert!(!passes(&assertion, &response));
    }

    #[test]
    fn test_truthy() {
        let response = create_response(
            200,
            r#"{"running": true, "jobs": [], "message": "", "period": {"id": 1}, "total": 0}"#,
        );

        assert!(passes(&Assertion::truthy("$.running"), &response));
        assert!(passes(&Assertion::truthy("$.period"), &response));
        assert!(!passes(&Assertion::truthy("$.jobs"), &response));
        assert!(!passes(&Assertion::truthy("$.message"), &response));
        assert!(!passes(&Assertion::truthy("$.total"), &response));
        assert!(!passes(&Assertion::truthy("$.missing"), &response));
    }

    #[test]
    fn test_json_type_and_iso_date() {
        let response = create_response(200, r#"{"items": [], "start_date": "2025-06-01", "end_date": "June 14"}"#);

        let array = Assertion::JsonType {
            path: "$.items".to_string(),
            kind: JsonKind::Array,
        };
        assert!(passes(&array, &response));

        let object = Assertion::JsonType {
            path: "$.items".to_string(),
            kind: JsonKind::Object,
        };
        assert!(!passes(&object, &response));

        let start = Assertion::IsoDate {
            path: "$.start_date".to_string(),
        };
        assert!(passes(&start, &response));

        let end = Assertion::IsoDate {
            path: "$.end_date".to_string(),
        };
        assert!(!passes(&end, &response));
    }

    #[test]
    fn test_is_json() {
        let response = create_response(200, r#"{"valid": true}"#);
        assert!(passes(&Assertion::IsJson, &response));

        let response = create_response(200, "not json");
        assert!(!passes(&Assertion::IsJson, &response));
    }

    #[test]
    fn test_run_suite() {
        let response = create_response(200, r#"{"message": "KPI Tracker API"}"#);

        let suite = TestSuite::new("GET /")
            .with_assertion(Assertion::status(200))
            .with_assertion(Assertion::IsJson)
            .with_assertion(Assertion::json_eq("$.message", json!("KPI Tracker API")));

        let results = TestRunner::run(&suite, &response);
        assert!(results.all_passed());
        assert_eq!(results.total, 3);
        assert_eq!(results.passed, 3);
    }

    #[test]
    fn test_suite_stops_on_first_failure() {
        let response = create_response(404, "Not Found");

        let suite = TestSuite::new("GET /goals")
            .with_assertion(Assertion::status(200))
            .with_assertion(Assertion::IsJson);

        let results = TestRunner::run(&suite, &response);
        assert!(!results.all_passed());
        assert_eq!(results.results.len(), 1);
    }

    #[test]
    fn test_run_all_reports_every_failure() {
        let response = create_response(200, r#"{"profit_daily": 70.0, "spins_daily": 70.0}"#);

        let suite = TestSuite::new("GET /goals")
            .with_assertion(Assertion::json_eq("$.profit_daily", json!(72.08)))
            .with_assertion(Assertion::json_eq("$.spins_daily", json!(74.17)))
            .run_all();

        let results = TestRunner::run(&suite, &response);
        assert_eq!(results.failed, 2);
        assert_eq!(results.failures().len(), 2);
    }
}
