use async_trait::async_trait;
use kpi_check_domain::{Assertion, RequestSpec};
use serde_json::Value;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

/// Biweekly stats are scoped to a period window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiweeklyStatsPeriodFilter;

#[async_trait]
impl Check for BiweeklyStatsPeriodFilter {
    fn name(&self) -> &'static str {
        "Biweekly Stats Period Filter"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Biweekly Stats Period Filter...");

        let stats = session
            .check_json(
                &RequestSpec::get("/stats/biweekly"),
                [
                    Assertion::status(200),
                    Assertion::truthy("$.period_id"),
                    Assertion::truthy("$.start_date"),
                    Assertion::truthy("$.end_date"),
                ],
            )
            .await?;

        let calls = section_total(&stats, "calls");
        let reservations = section_total(&stats, "reservations");
        if calls == 0.0 && reservations == 0.0 {
            tracing::warn!("Minor: Biweekly stats show no activity despite test data additions");
        }

        let field = |name: &str| {
            stats
                .get(name)
                .map(|v| v.as_str().map_or_else(|| v.to_string(), ToString::to_string))
                .unwrap_or_default()
        };
        tracing::info!(
            "✅ Biweekly stats correctly filtered for period {}",
            field("period_id")
        );
        tracing::info!("   Period: {} to {}", field("start_date"), field("end_date"));
        tracing::info!("   Calls: {calls}, Reservations: {reservations}");
        if let Some(warning) = period_mismatch(&stats, session.current_period_id()) {
            tracing::warn!("{warning}");
        }
        Ok(())
    }
}

/// Warns when the stats window is not the period `GET /periods/current`
/// reported earlier in the run.
fn period_mismatch(stats: &Value, current: Option<&str>) -> Option<String> {
    let current = current.filter(|id| !id.is_empty())?;
    let reported = stats.get("period_id").and_then(Value::as_str)?;
    (reported != current)
        .then(|| format!("Biweekly stats cover {reported}, current period is {current}"))
}

/// `<section>.total` as a number, 0 when absent.
fn section_total(stats: &Value, section: &str) -> f64 {
    stats
        .get(section)
        .and_then(|s| s.get("total"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_section_total() {
        let stats = json!({"calls": {"total": 250}, "reservations": {}});
        assert_eq!(section_total(&stats, "calls"), 250.0);
        assert_eq!(section_total(&stats, "reservations"), 0.0);
        assert_eq!(section_total(&stats, "profit"), 0.0);
    }

    #[test]
    fn test_period_mismatch() {
        let stats = json!({"period_id": "2025-06-01_to_2025-06-14"});
        assert_eq!(period_mismatch(&stats, Some("2025-06-01_to_2025-06-14")), None);
        assert_eq!(period_mismatch(&stats, None), None);
        assert_eq!(period_mismatch(&stats, Some("")), None);
        assert_eq!(
            period_mismatch(&stats, Some("2025-06-15_to_2025-06-28")),
            Some(
                "Biweekly stats cover 2025-06-01_to_2025-06-14, current period is 2025-06-15_to_2025-06-28"
                    .to_string()
            )
        );
    }
}
