//! Clock port for time-related operations

use chrono::NaiveDate;

/// Port for getting the current date.
///
/// The checklist works on "today" from the service's point of view; tests
/// substitute a fixed date.
pub trait Clock: Send + Sync {
    /// Returns the current local calendar date.
    fn today(&self) -> NaiveDate;
}
