use async_trait::async_trait;
use kpi_check_domain::kpi::GOAL_FIELDS;
use kpi_check_domain::{Assertion, GoalsUpdate, RequestSpec};
use serde_json::json;

use super::Check;
use crate::error::{ApplicationError, ApplicationResult};
use crate::session::KpiSession;

const UPDATED: GoalsUpdate = GoalsUpdate {
    calls_daily: 150,
    profit_daily: 80.0,
};

/// Goal thresholds are readable, match the shipped constants, and (when the
/// endpoint exists) are writable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalsApi;

#[async_trait]
impl Check for GoalsApi {
    fn name(&self) -> &'static str {
        "Goals API"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Goals API...");

        let mut expectations = vec![
            Assertion::status(200),
            Assertion::required_fields("$", &GOAL_FIELDS),
        ];
        expectations.extend(
            session
                .targets()
                .fixed_fields()
                .into_iter()
                .map(|(field, value)| Assertion::json_eq(format!("$.{field}"), json!(value))),
        );
        session
            .check(&RequestSpec::get("/goals"), expectations)
            .await?;
        tracing::info!("✅ GET /goals working correctly");

        let update = RequestSpec::put("/goals").with_payload(&UPDATED)?;
        let response = session.send(&update).await?;
        match response.status {
            200 => {
                let verified = session.verify(
                    &update.describe(),
                    &response,
                    [
                        Assertion::json_eq("$.calls_daily", json!(UPDATED.calls_daily)),
                        Assertion::json_eq("$.profit_daily", json!(UPDATED.profit_daily)),
                    ],
                );
                restore_goals(session).await;
                verified?;
                tracing::info!("✅ PUT /goals working correctly");
                Ok(())
            }
            405 => {
                tracing::warn!("ℹ️  PUT /goals not implemented (405 Method Not Allowed)");
                Ok(())
            }
            status => Err(ApplicationError::check_failed(
                update.describe(),
                format!("PUT /goals failed: {status}"),
            )),
        }
    }
}

async fn restore_goals(session: &KpiSession) {
    let targets = session.targets();
    let original = GoalsUpdate {
        calls_daily: targets.calls_daily,
        profit_daily: targets.profit_daily,
    };
    let restored = match RequestSpec::put("/goals").with_payload(&original) {
        Ok(request) => session.send(&request).await.map(|r| r.status),
        Err(e) => Err(e.into()),
    };
    match restored {
        Ok(200) => tracing::debug!("goals restored"),
        Ok(status) => tracing::warn!(status, "could not restore goals"),
        Err(e) => tracing::warn!(error = %e, "could not restore goals"),
    }
}
