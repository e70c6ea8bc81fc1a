//! KPI Check Domain - Core types
//!
//! This crate defines the domain model for the KPI Tracker API checklist:
//! request and response specs, response assertions, API payloads and
//! period identifiers. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod kpi;
pub mod period;
pub mod report;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use kpi::{GoalTargets, GoalsUpdate, NewBooking, NewMiscIncome, NewSpin, RecordKind};
pub use period::{PeriodId, parse_date};
pub use report::{CheckOutcome, RunSummary};
pub use request::{HttpMethod, RequestBody, RequestSpec};
pub use response::{ResponseSpec, StatusCode};
pub use testing::{
    Assertion, AssertionResult, ComparisonOperator, JsonKind, TestResults, TestSuite, is_truthy,
};
