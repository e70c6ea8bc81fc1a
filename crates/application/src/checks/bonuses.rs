use async_trait::async_trait;
use kpi_check_domain::{Assertion, NewSpin, RecordKind};
use serde_json::json;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

const SPIN: NewSpin = NewSpin {
    amount: 5.00,
    is_mega: false,
    booking_number: 4,
};

/// A bonus spin can be added to today's entry and removed again.
#[derive(Debug, Clone, Copy, Default)]
pub struct BonusesApi;

#[async_trait]
impl Check for BonusesApi {
    fn name(&self) -> &'static str {
        "Bonuses API"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Bonuses API...");

        let (_, id) = session
            .create_identified_record(
                RecordKind::Spin,
                &SPIN,
                [
                    Assertion::json_eq("$.spins[-1].amount", json!(SPIN.amount)),
                    Assertion::json_eq("$.spins[-1].is_mega", json!(SPIN.is_mega)),
                    Assertion::json_eq("$.spins[-1].booking_number", json!(SPIN.booking_number)),
                ],
            )
            .await?;
        tracing::info!("✅ POST /entries/{{date}}/spins working correctly");

        session.delete_record(RecordKind::Spin, &id).await?;
        tracing::info!("✅ DELETE /entries/{{date}}/spins/{{spin_id}} working correctly");
        Ok(())
    }
}
