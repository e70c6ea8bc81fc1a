use async_trait::async_trait;
use kpi_check_domain::period::PERIOD_SEPARATOR;
use kpi_check_domain::{Assertion, NewBooking, NewSpin, RecordKind, RequestSpec};
use serde_json::json;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

const CALLS: u32 = 150;

const BOOKING: NewBooking = NewBooking {
    profit: 15.75,
    is_prepaid: true,
    has_refund_protection: false,
    time_since_last: Some(120),
};

const SPIN: NewSpin = NewSpin {
    amount: 8.50,
    is_mega: false,
    booking_number: 3,
};

/// Every write to the fixture entry keeps it assigned to a period.
///
/// The booking and spin created here stay on the server until teardown so
/// that the period filter check sees activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodAssignment;

#[async_trait]
impl Check for PeriodAssignment {
    fn name(&self) -> &'static str {
        "Period Assignment"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Period Assignment...");

        session
            .check(
                &RequestSpec::get("/entries/today"),
                [
                    Assertion::status(200),
                    Assertion::truthy("$.period_id"),
                    Assertion::contains("$.period_id", json!(PERIOD_SEPARATOR)),
                ],
            )
            .await?;
        tracing::info!("✅ Today's entry has correct period_id");

        let update = RequestSpec::put(session.entry_path("calls")).with_query("calls_received", CALLS);
        session
            .check(
                &update,
                [Assertion::status(200), Assertion::truthy("$.period_id")],
            )
            .await?;
        tracing::info!("✅ Calls update maintains period_id");

        session
            .create_record(
                RecordKind::Booking,
                &BOOKING,
                [Assertion::truthy("$.period_id")],
            )
            .await?;
        tracing::info!("✅ Booking addition maintains period_id");

        session
            .create_record(RecordKind::Spin, &SPIN, [Assertion::truthy("$.period_id")])
            .await?;
        tracing::info!("✅ Spin addition maintains period_id");
        Ok(())
    }
}
