//! The named checks of the KPI Tracker checklist, in execution order.

mod biweekly_filter;
mod bonuses;
mod bookings;
mod connection;
mod daily_entries;
mod force_archive;
mod goals;
mod misc_income;
mod period_assignment;
mod period_management;
mod stats;

use async_trait::async_trait;

use crate::error::ApplicationResult;
use crate::session::KpiSession;

pub use biweekly_filter::BiweeklyStatsPeriodFilter;
pub use bonuses::BonusesApi;
pub use bookings::BookingsApi;
pub use connection::ApiConnection;
pub use daily_entries::DailyEntriesApi;
pub use force_archive::ForceArchive;
pub use goals::GoalsApi;
pub use misc_income::MiscIncomeApi;
pub use period_assignment::PeriodAssignment;
pub use period_management::PeriodManagementApi;
pub use stats::StatsApi;

/// One named check of the checklist.
///
/// A check returns `Ok(())` when every step passed. Any error fails the
/// check; the runner logs it and moves on to the next one.
#[async_trait]
pub trait Check: Send + Sync {
    /// Name shown in the log and the summary.
    fn name(&self) -> &'static str;

    /// Runs the check against the session's API.
    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()>;
}

/// The full checklist in the order the checks depend on each other.
#[must_use]
pub fn standard_checklist() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(ApiConnection),
        Box::new(GoalsApi),
        Box::new(DailyEntriesApi),
        Box::new(BookingsApi),
        Box::new(BonusesApi),
        Box::new(MiscIncomeApi),
        Box::new(StatsApi),
        Box::new(PeriodManagementApi),
        Box::new(PeriodAssignment),
        Box::new(BiweeklyStatsPeriodFilter),
        Box::new(ForceArchive),
    ]
}
