//! KPI Check Application - Checklist orchestration
//!
//! This crate holds the named checks of the KPI Tracker API checklist, the
//! session they share, and the use case that runs them. Ports describe the
//! HTTP transport, the assertion evaluator and the clock; adapters live in
//! the infrastructure crate.

pub mod checks;
pub mod error;
pub mod ports;
pub mod session;
pub mod settings;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use checks::{Check, standard_checklist};
pub use error::{ApplicationError, ApplicationResult};
pub use session::{FixtureLedger, FixtureRecord, KpiSession, SessionConfig};
pub use settings::Settings;
pub use use_cases::RunChecklist;
