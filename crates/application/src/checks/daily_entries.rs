use async_trait::async_trait;
use kpi_check_domain::{Assertion, RequestSpec};
use serde_json::json;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

const CALLS: u32 = 100;

/// Today's entry exists and its calls count can be set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyEntriesApi;

#[async_trait]
impl Check for DailyEntriesApi {
    fn name(&self) -> &'static str {
        "Daily Entries API"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Daily Entries API...");
        let date = session.test_date_str();

        let entry = session
            .check_json(
                &RequestSpec::get("/entries/today"),
                [
                    Assertion::status(200),
                    Assertion::json_eq("$.date", json!(date)),
                ],
            )
            .await?;
        if let Some(calls) = entry.get("calls_received").and_then(serde_json::Value::as_i64) {
            let test_date = session.test_date();
            session.ledger_mut().remember_calls(test_date, calls);
        }
        tracing::info!("✅ GET /entries/today working correctly");

        let update = RequestSpec::put(session.entry_path("calls")).with_query("calls_received", CALLS);
        session
            .check(
                &update,
                [
                    Assertion::status(200),
                    Assertion::json_eq("$.calls_received", json!(CALLS)),
                ],
            )
            .await?;
        tracing::info!("✅ PUT /entries/{{date}}/calls working correctly");
        Ok(())
    }
}
