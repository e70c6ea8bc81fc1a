use async_trait::async_trait;
use kpi_check_domain::kpi::API_GREETING;
use kpi_check_domain::{Assertion, RequestSpec};
use serde_json::json;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

/// `GET /` answers with the API greeting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiConnection;

#[async_trait]
impl Check for ApiConnection {
    fn name(&self) -> &'static str {
        "API Connection"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing API connectivity...");
        session
            .check(
                &RequestSpec::get("/"),
                [
                    Assertion::status(200),
                    Assertion::IsJson,
                    Assertion::json_eq("$.message", json!(API_GREETING)),
                ],
            )
            .await?;
        tracing::info!("✅ API connection successful");
        Ok(())
    }
}
