//! Response specification type
//!
//! Contains types for representing HTTP responses: status code, body and
//! timing information.

use std::time::Duration;

use crate::error::{DomainError, DomainResult};

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns the canonical reason phrase for the codes the API returns.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// HTTP response specification.
///
/// Contains what the checks read from an HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Response body as string.
    pub body: String,
    /// Response time.
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    ///
    /// Bodies that are not UTF-8 are decoded lossily.
    #[must_use]
    pub fn new(status: u16, body: Vec<u8>, duration: Duration) -> Self {
        let body = String::from_utf8(body)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Self {
            status,
            body,
            duration,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        StatusCode(self.status).is_success()
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidJson`] if the body is not valid JSON.
    pub fn json(&self) -> DomainResult<serde_json::Value> {
        serde_json::from_str(&self.body).map_err(|e| DomainError::InvalidJson(e.to_string()))
    }

    /// Returns a short preview of the body for log lines.
    #[must_use]
    pub fn body_preview(&self) -> String {
        const LIMIT: usize = 200;
        match self.body.char_indices().nth(LIMIT) {
            Some((idx, _)) => format!("{}...", &self.body[..idx]),
            None => self.body.clone(),
        }
    }

    /// Returns a human-readable duration string (e.g., "124 ms").
    #[must_use]
    pub fn duration_display(&self) -> String {
        let millis = self.duration.as_millis();
        if millis < 1000 {
            format!("{millis} ms")
        } else {
            format!("{:.2} s", self.duration.as_secs_f64())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode(200).to_string(), "200 OK");
        assert_eq!(StatusCode(404).to_string(), "404 Not Found");
        assert_eq!(StatusCode(405).to_string(), "405 Method Not Allowed");
        assert_eq!(StatusCode(418).to_string(), "418 Unknown");
    }

    #[test]
    fn test_response_new() {
        let response = ResponseSpec::new(
            200,
            br#"{"message":"KPI Tracker API"}"#.to_vec(),
            Duration::from_millis(100),
        );

        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert_eq!(response.json().unwrap(), json!({"message": "KPI Tracker API"}));
    }

    #[test]
    fn test_response_new_decodes_invalid_utf8_lossily() {
        let response = ResponseSpec::new(500, vec![b'o', b'k', 0xff], Duration::ZERO);
        assert_eq!(response.body, "ok\u{fffd}");
        assert!(!response.is_success());
    }

    #[test]
    fn test_json_rejects_html() {
        let response = ResponseSpec::new(502, b"<html>Bad Gateway</html>".to_vec(), Duration::ZERO);
        assert!(matches!(response.json(), Err(DomainError::InvalidJson(_))));
    }

    #[test]
    fn test_body_preview_truncates() {
        let response = ResponseSpec {
            body: "x".repeat(250),
            ..Default::default()
        };
        let preview = response.body_preview();
        assert_eq!(preview.len(), 203);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_response_duration_display() {
        let response = ResponseSpec {
            duration: Duration::from_millis(150),
            ..Default::default()
        };
        assert_eq!(response.duration_display(), "150 ms");

        let response = ResponseSpec {
            duration: Duration::from_millis(1500),
            ..Default::default()
        };
        assert_eq!(response.duration_display(), "1.50 s");
    }
}
