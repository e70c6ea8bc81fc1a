//! Application error types

use thiserror::Error;
use kpi_check_domain::DomainError;

use crate::ports::HttpClientError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// A response did not satisfy the expectations of a check step.
    #[error("{step}: {}", failures.join("; "))]
    CheckFailed {
        /// The step that failed, usually the request line.
        step: String,
        /// Failure messages, one per failed assertion.
        failures: Vec<String>,
    },

    /// The configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApplicationError {
    /// Builds a [`ApplicationError::CheckFailed`] with a single message.
    #[must_use]
    pub fn check_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckFailed {
            step: step.into(),
            failures: vec![message.into()],
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failed_display() {
        let err = ApplicationError::CheckFailed {
            step: "GET /goals".to_string(),
            failures: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "GET /goals: first; second");
    }

    #[test]
    fn test_http_error_display() {
        let err = ApplicationError::from(HttpClientError::ConnectionFailed("reset".to_string()));
        assert_eq!(err.to_string(), "HTTP error: connection failed: reset");
    }
}
