use async_trait::async_trait;
use kpi_check_domain::kpi::{BIWEEKLY_STAT_SECTIONS, DAILY_STAT_SECTIONS};
use kpi_check_domain::{Assertion, RequestSpec};
use serde_json::json;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

/// Biweekly and daily stats carry their sections and the configured goals.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsApi;

#[async_trait]
impl Check for StatsApi {
    fn name(&self) -> &'static str {
        "Stats API"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Stats API...");
        let targets = *session.targets();

        session
            .check(
                &RequestSpec::get("/stats/biweekly"),
                [
                    Assertion::status(200),
                    Assertion::required_fields("$", &BIWEEKLY_STAT_SECTIONS),
                    Assertion::json_eq("$.profit.goal", json!(targets.profit_biweekly)),
                    Assertion::json_eq("$.spins.goal", json!(targets.spins_biweekly)),
                    Assertion::exists("$.period_id"),
                ],
            )
            .await?;
        tracing::info!("✅ GET /stats/biweekly working correctly");

        let date = session.test_date_str();
        session
            .check(
                &RequestSpec::get(format!("/stats/daily/{date}")),
                [
                    Assertion::status(200),
                    Assertion::required_fields("$", &DAILY_STAT_SECTIONS),
                    Assertion::json_eq("$.date", json!(date)),
                ],
            )
            .await?;
        tracing::info!("✅ GET /stats/daily/{{date}} working correctly");
        Ok(())
    }
}
