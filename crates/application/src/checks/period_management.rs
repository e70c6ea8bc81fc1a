use async_trait::async_trait;
use chrono::NaiveDate;
use kpi_check_domain::kpi::{
    CURRENT_PERIOD_FIELDS, MIGRATION_FIELDS, MISSING_PERIOD_ID, PERIOD_ARCHIVER_JOB,
    PERIOD_LOG_FIELDS,
};
use kpi_check_domain::period::PERIOD_SEPARATOR;
use kpi_check_domain::{Assertion, JsonKind, PeriodId, RequestSpec, is_truthy};
use serde_json::{Value, json};

use super::Check;
use crate::error::{ApplicationError, ApplicationResult};
use crate::session::KpiSession;

/// Current period, scheduler, legacy migration and archived period endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodManagementApi;

#[async_trait]
impl Check for PeriodManagementApi {
    fn name(&self) -> &'static str {
        "Period Management API"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Period Management API...");

        current_period(session).await?;
        scheduler_status(session).await?;

        session
            .check(
                &RequestSpec::post("/admin/migrate-legacy"),
                [
                    Assertion::status(200),
                    Assertion::required_fields("$", &MIGRATION_FIELDS),
                ],
            )
            .await?;
        tracing::info!("✅ POST /admin/migrate-legacy working correctly");

        archived_periods(session).await?;

        session
            .check(
                &RequestSpec::get(format!("/periods/{MISSING_PERIOD_ID}")),
                [Assertion::status(404)],
            )
            .await?;
        tracing::info!("✅ GET /periods/{{period_id}} returns 404 for non-existent period");
        Ok(())
    }
}

async fn current_period(session: &mut KpiSession) -> ApplicationResult<()> {
    let current = session
        .check_json(
            &RequestSpec::get("/periods/current"),
            [
                Assertion::status(200),
                Assertion::required_fields("$", &CURRENT_PERIOD_FIELDS),
                Assertion::truthy("$.period_id"),
                Assertion::contains("$.period_id", json!(PERIOD_SEPARATOR)),
                Assertion::IsoDate {
                    path: "$.start_date".to_string(),
                },
                Assertion::IsoDate {
                    path: "$.end_date".to_string(),
                },
            ],
        )
        .await?;

    let period_id = current
        .get("period_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    for warning in period_window_warnings(&current, session.test_date()) {
        tracing::warn!(period_id = %period_id, "{warning}");
    }
    session.set_current_period_id(period_id);
    tracing::info!("✅ GET /periods/current working correctly");
    Ok(())
}

async fn scheduler_status(session: &KpiSession) -> ApplicationResult<()> {
    let request = RequestSpec::get("/admin/scheduler-status");
    let status = session
        .check_json(
            &request,
            [
                Assertion::status(200),
                Assertion::truthy("$.running"),
                Assertion::truthy("$.jobs"),
            ],
        )
        .await?;

    let archiver = status
        .get("jobs")
        .and_then(Value::as_array)
        .and_then(|jobs| {
            jobs.iter()
                .find(|job| job.get("id").and_then(Value::as_str) == Some(PERIOD_ARCHIVER_JOB))
        })
        .ok_or_else(|| {
            ApplicationError::check_failed(
                request.describe(),
                "Period archiver job not found in scheduler",
            )
        })?;

    let complete = ["name", "trigger"]
        .iter()
        .all(|field| archiver.get(*field).is_some_and(is_truthy));
    if !complete {
        return Err(ApplicationError::check_failed(
            request.describe(),
            "Period archiver job missing required fields",
        ));
    }
    tracing::info!("✅ GET /admin/scheduler-status working correctly");
    Ok(())
}

async fn archived_periods(session: &mut KpiSession) -> ApplicationResult<()> {
    let request = RequestSpec::get("/periods");
    let response = session.send(&request).await?;
    session.verify(
        &request.describe(),
        &response,
        [
            Assertion::status(200),
            Assertion::JsonType {
                path: "$".to_string(),
                kind: JsonKind::Array,
            },
        ],
    )?;

    let periods = response.json()?;
    if let Some(first) = periods.as_array().and_then(|list| list.first()) {
        session.verify(
            &request.describe(),
            &response,
            [Assertion::required_fields("$[0]", &PERIOD_LOG_FIELDS)],
        )?;
        if let Some(id) = first.get("period_id").and_then(Value::as_str)
            && !id.is_empty()
        {
            session.set_archived_period_id(id);
        }
    }
    tracing::info!("✅ GET /periods working correctly");

    if let Some(id) = session.archived_period_id().map(ToString::to_string) {
        session
            .check(
                &RequestSpec::get(format!("/periods/{id}")),
                [
                    Assertion::status(200),
                    Assertion::json_eq("$.period_id", json!(id)),
                ],
            )
            .await?;
        tracing::info!("✅ GET /periods/{{period_id}} working correctly");
    }
    Ok(())
}

/// Inconsistencies between a current-period document and `today` that are
/// worth reporting but do not fail the check.
#[must_use]
pub fn period_window_warnings(current: &Value, today: NaiveDate) -> Vec<String> {
    let raw = current
        .get("period_id")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let period: PeriodId = match raw.parse() {
        Ok(period) => period,
        Err(e) => return vec![format!("period_id is not a date window: {e}")],
    };

    let mut warnings = Vec::new();
    if !period.contains(today) {
        warnings.push(format!("current period does not contain {today}"));
    }
    let bounds = [
        ("start_date", period.start()),
        ("end_date", period.end()),
    ];
    for (field, expected) in bounds {
        let reported = current.get(field).and_then(Value::as_str);
        let expected = expected.to_string();
        if reported != Some(expected.as_str()) {
            warnings.push(format!(
                "{field} {} disagrees with period_id ({expected})",
                reported.unwrap_or("<missing>")
            ));
        }
    }
    warnings
}
