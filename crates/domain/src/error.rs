//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be decoded as JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// A request payload could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A period identifier does not follow `YYYY-MM-DD_to_YYYY-MM-DD`.
    #[error("invalid period id '{id}': {reason}")]
    InvalidPeriodId {
        /// The rejected identifier.
        id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A calendar date is not a valid `YYYY-MM-DD` value.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
