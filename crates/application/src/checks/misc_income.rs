use async_trait::async_trait;
use kpi_check_domain::{Assertion, NewMiscIncome, RecordKind};
use serde_json::json;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

const AMOUNT: f64 = 25.00;
const SOURCE: &str = "request_lead";

/// A misc income record can be added to today's entry and removed again.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiscIncomeApi;

#[async_trait]
impl Check for MiscIncomeApi {
    fn name(&self) -> &'static str {
        "Misc Income API"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Misc Income API...");

        let payload = NewMiscIncome {
            amount: AMOUNT,
            source: SOURCE.to_string(),
        };
        let (_, id) = session
            .create_identified_record(
                RecordKind::Misc,
                &payload,
                [
                    Assertion::json_eq("$.misc_income[-1].amount", json!(AMOUNT)),
                    Assertion::json_eq("$.misc_income[-1].source", json!(SOURCE)),
                ],
            )
            .await?;
        tracing::info!("✅ POST /entries/{{date}}/misc working correctly");

        session.delete_record(RecordKind::Misc, &id).await?;
        tracing::info!("✅ DELETE /entries/{{date}}/misc/{{misc_id}} working correctly");
        Ok(())
    }
}
