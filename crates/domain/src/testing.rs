//! Response testing and assertions.
//!
//! This module provides types for declaring assertions on HTTP responses and
//! for collecting their results. Evaluation lives in the infrastructure layer.

use serde::{Deserialize, Serialize};

/// A test assertion to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code.
        expected: u16,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check JSON path exists and optionally its value.
    ///
    /// Numbers compare by value, so `150` equals `150.0`.
    JsonPath {
        /// JSONPath expression (e.g., "$.bookings[-1].profit").
        path: String,
        /// Expected value (as JSON).
        expected: Option<serde_json::Value>,
    },
    /// Check JSON path value matches condition.
    JsonPathMatches {
        /// JSONPath expression.
        path: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Value to compare against.
        value: serde_json::Value,
    },
    /// Check the object at a path carries every listed field.
    RequiredFields {
        /// JSONPath expression of the object.
        path: String,
        /// Field names that must be present.
        fields: Vec<String>,
    },
    /// Check the value at a path is truthy.
    ///
    /// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
    Truthy {
        /// JSONPath expression.
        path: String,
    },
    /// Check the JSON kind of the value at a path.
    JsonType {
        /// JSONPath expression.
        path: String,
        /// Expected kind.
        kind: JsonKind,
    },
    /// Check the value at a path is a `YYYY-MM-DD` date string.
    IsoDate {
        /// JSONPath expression.
        path: String,
    },
}

impl Assertion {
    /// Shorthand for an exact status code assertion.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode { expected: code }
    }

    /// Shorthand for a JSON path equality assertion.
    #[must_use]
    pub fn json_eq(path: impl Into<String>, expected: serde_json::Value) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(expected),
        }
    }

    /// Shorthand for a JSON path existence assertion.
    #[must_use]
    pub fn exists(path: impl Into<String>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: None,
        }
    }

    /// Shorthand for a required-fields assertion.
    #[must_use]
    pub fn required_fields(path: impl Into<String>, fields: &[&str]) -> Self {
        Self::RequiredFields {
            path: path.into(),
            fields: fields.iter().map(ToString::to_string).collect(),
        }
    }

    /// Shorthand for a truthiness assertion.
    #[must_use]
    pub fn truthy(path: impl Into<String>) -> Self {
        Self::Truthy { path: path.into() }
    }

    /// Shorthand for a substring/element containment assertion.
    #[must_use]
    pub fn contains(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::JsonPathMatches {
            path: path.into(),
            operator: ComparisonOperator::Contains,
            value,
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code = {expected}"),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::JsonPathMatches {
                path,
                operator,
                value,
            } => format!("JSON {path} {} {value}", operator.symbol()),
            Self::RequiredFields { path, fields } => {
                format!("JSON {path} has fields [{}]", fields.join(", "))
            }
            Self::Truthy { path } => format!("JSON {path} is set"),
            Self::JsonType { path, kind } => format!("JSON {path} is {}", kind.as_str()),
            Self::IsoDate { path } => format!("JSON {path} is a YYYY-MM-DD date"),
        }
    }
}

/// Comparison operators for value assertions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal to, with numbers compared by value.
    Equals,
    /// Substring of a string, or element of an array.
    Contains,
}

impl ComparisonOperator {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::Contains => "contains",
        }
    }
}

/// Kinds of JSON values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Bool,
    /// JSON `null`.
    Null,
}

impl JsonKind {
    /// Returns the kind of `value`.
    #[must_use]
    pub const fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::Bool(_) => Self::Bool,
            serde_json::Value::Null => Self::Null,
        }
    }

    /// Returns the kind name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Null => "null",
        }
    }
}

/// Truthiness of a JSON value.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy; everything else is
/// truthy.
#[must_use]
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }

    /// Message describing the failure, falling back to the assertion text.
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| format!("{} failed", self.assertion.description()))
    }
}

/// A named group of assertions evaluated against one response.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TestSuite {
    /// Test suite name, usually the request under test.
    pub name: String,
    /// Assertions to run.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// Whether to stop on first failure.
    #[serde(default)]
    pub stop_on_failure: bool,
}

impl TestSuite {
    /// Create a new empty test suite.
    ///
    /// Suites stop at the first failed assertion unless [`Self::run_all`]
    /// is applied.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
            stop_on_failure: true,
        }
    }

    /// Add an assertion to the suite.
    pub fn add(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Keep evaluating after a failure (builder pattern).
    #[must_use]
    pub const fn run_all(mut self) -> Self {
        self.stop_on_failure = false;
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(suite_name: impl Into<String>, results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed,
        }
    }

    /// Check if all tests passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Failure messages of the assertions that did not pass.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(AssertionResult::failure_message)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(404).description(), "Status code = 404");
        assert_eq!(
            Assertion::required_fields("$", &["running", "jobs"]).description(),
            "JSON $ has fields [running, jobs]"
        );
        assert_eq!(
            Assertion::contains("$.period_id", json!("_to_")).description(),
            r#"JSON $.period_id contains "_to_""#
        );
    }

    #[test]
    fn test_json_kind_of() {
        assert_eq!(JsonKind::of(&json!([])), JsonKind::Array);
        assert_eq!(JsonKind::of(&json!({})), JsonKind::Object);
        assert_eq!(JsonKind::of(&json!(1.5)), JsonKind::Number);
        assert_eq!(JsonKind::of(&json!(null)), JsonKind::Null);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!("2025-06-01_to_2025-06-14")));
        assert!(is_truthy(&json!({"period_id": "x"})));
        assert!(is_truthy(&json!(-1)));
    }

    #[test]
    fn test_suite_defaults_to_stop_on_failure() {
        let suite = TestSuite::new("GET /goals")
            .with_assertion(Assertion::status(200))
            .with_assertion(Assertion::IsJson);

        assert!(suite.stop_on_failure);
        assert_eq!(suite.len(), 2);
        assert!(!suite.run_all().stop_on_failure);
    }

    #[test]
    fn test_test_results() {
        let results = vec![
            AssertionResult::pass(Assertion::status(200)),
            AssertionResult::fail(Assertion::IsJson, "Invalid JSON"),
            AssertionResult {
                assertion: Assertion::truthy("$.message"),
                passed: false,
                actual: None,
                error: None,
            },
        ];

        let test_results = TestResults::new("Suite", results);
        assert_eq!(test_results.total, 3);
        assert_eq!(test_results.passed, 1);
        assert_eq!(test_results.failed, 2);
        assert!(!test_results.all_passed());
        assert_eq!(
            test_results.failures(),
            vec![
                "Invalid JSON".to_string(),
                "JSON $.message is set failed".to_string()
            ]
        );
    }
}
