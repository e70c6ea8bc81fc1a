//! Checklist session state.
//!
//! A [`KpiSession`] carries the ports, the run settings and everything a
//! check learns that a later check or the teardown needs: fixtures still
//! present on the server, the calls count to restore, discovered period ids.

use std::sync::Arc;

use chrono::NaiveDate;
use kpi_check_domain::period::DATE_FORMAT;
use kpi_check_domain::{
    Assertion, GoalTargets, RecordKind, RequestSpec, ResponseSpec, TestSuite,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpClient, ResponseVerifier};

/// A record created by the checklist and not yet deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRecord {
    /// Kind of sub-record.
    pub kind: RecordKind,
    /// Entry date the record hangs off.
    pub date: NaiveDate,
    /// Server-assigned id.
    pub id: String,
}

/// Records created during the run, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureLedger {
    pending: Vec<FixtureRecord>,
    original_calls: Option<(NaiveDate, i64)>,
}

impl FixtureLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            original_calls: None,
        }
    }

    /// Registers a created record.
    pub fn track(&mut self, record: FixtureRecord) {
        self.pending.push(record);
    }

    /// Drops a record once it is deleted. Returns whether it was tracked.
    pub fn forget(&mut self, kind: RecordKind, id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|r| !(r.kind == kind && r.id == id));
        before != self.pending.len()
    }

    /// Records still present on the server.
    #[must_use]
    pub fn pending(&self) -> &[FixtureRecord] {
        &self.pending
    }

    /// Takes every pending record, leaving the ledger empty.
    pub fn drain(&mut self) -> Vec<FixtureRecord> {
        std::mem::take(&mut self.pending)
    }

    /// Remembers the calls count seen before the first mutation. Later calls
    /// are ignored.
    pub fn remember_calls(&mut self, date: NaiveDate, calls: i64) {
        if self.original_calls.is_none() {
            self.original_calls = Some((date, calls));
        }
    }

    /// Takes the calls count to restore, if one was recorded.
    pub fn take_original_calls(&mut self) -> Option<(NaiveDate, i64)> {
        self.original_calls.take()
    }
}

/// Settings a session needs to talk to the API.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Date used for every entry fixture.
    pub test_date: NaiveDate,
    /// Goal thresholds the backend is expected to report.
    pub targets: GoalTargets,
}

impl SessionConfig {
    /// Config for `test_date` with the default goal targets.
    #[must_use]
    pub const fn new(test_date: NaiveDate) -> Self {
        Self {
            test_date,
            targets: GoalTargets::DEFAULT,
        }
    }
}

/// State shared by the checks of one run.
pub struct KpiSession {
    client: Arc<dyn HttpClient>,
    verifier: Arc<dyn ResponseVerifier>,
    config: SessionConfig,
    ledger: FixtureLedger,
    current_period_id: Option<String>,
    archived_period_id: Option<String>,
}

impl KpiSession {
    /// Creates a session.
    #[must_use]
    pub fn new(
        client: Arc<dyn HttpClient>,
        verifier: Arc<dyn ResponseVerifier>,
        config: SessionConfig,
    ) -> Self {
        Self {
            client,
            verifier,
            config,
            ledger: FixtureLedger::new(),
            current_period_id: None,
            archived_period_id: None,
        }
    }

    /// Base URL of the API under test.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Fixture date.
    #[must_use]
    pub const fn test_date(&self) -> NaiveDate {
        self.config.test_date
    }

    /// Fixture date as `YYYY-MM-DD`.
    #[must_use]
    pub fn test_date_str(&self) -> String {
        self.config.test_date.format(DATE_FORMAT).to_string()
    }

    /// Expected goal thresholds.
    #[must_use]
    pub const fn targets(&self) -> &GoalTargets {
        &self.config.targets
    }

    /// Fixture ledger.
    #[must_use]
    pub const fn ledger(&self) -> &FixtureLedger {
        &self.ledger
    }

    /// Mutable fixture ledger.
    pub fn ledger_mut(&mut self) -> &mut FixtureLedger {
        &mut self.ledger
    }

    /// Period id reported by `GET /periods/current`, once known.
    #[must_use]
    pub fn current_period_id(&self) -> Option<&str> {
        self.current_period_id.as_deref()
    }

    /// Stores the current period id.
    pub fn set_current_period_id(&mut self, id: impl Into<String>) {
        self.current_period_id = Some(id.into());
    }

    /// First archived period id seen in `GET /periods`, once known.
    #[must_use]
    pub fn archived_period_id(&self) -> Option<&str> {
        self.archived_period_id.as_deref()
    }

    /// Stores an archived period id.
    pub fn set_archived_period_id(&mut self, id: impl Into<String>) {
        self.archived_period_id = Some(id.into());
    }

    /// Path below the fixture entry, e.g. `/entries/2025-06-01/bookings`.
    #[must_use]
    pub fn entry_path(&self, suffix: &str) -> String {
        entry_path(self.config.test_date, suffix)
    }

    /// Sends a request without judging the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Http`] when no response arrives.
    pub async fn send(&self, request: &RequestSpec) -> ApplicationResult<ResponseSpec> {
        let response = self.client.execute(request).await?;
        tracing::debug!(
            request = %request.describe(),
            status = response.status,
            elapsed = %response.duration_display(),
            "response received"
        );
        Ok(response)
    }

    /// Evaluates `assertions` against `response`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::CheckFailed`] naming `step` and every
    /// failed assertion.
    pub fn verify(
        &self,
        step: &str,
        response: &ResponseSpec,
        assertions: impl IntoIterator<Item = Assertion>,
    ) -> ApplicationResult<()> {
        let mut suite = TestSuite::new(step);
        for assertion in assertions {
            suite.add(assertion);
        }

        let results = self.verifier.verify(&suite, response);
        if results.all_passed() {
            return Ok(());
        }

        let mut failures = results.failures();
        if !response.is_success() {
            failures.push(format!("body: {}", response.body_preview()));
        }
        Err(ApplicationError::CheckFailed {
            step: step.to_string(),
            failures,
        })
    }

    /// Sends `request` and evaluates `assertions` against the response.
    ///
    /// # Errors
    ///
    /// Returns transport errors and [`ApplicationError::CheckFailed`].
    pub async fn check(
        &self,
        request: &RequestSpec,
        assertions: impl IntoIterator<Item = Assertion>,
    ) -> ApplicationResult<ResponseSpec> {
        let response = self.send(request).await?;
        self.verify(&request.describe(), &response, assertions)?;
        Ok(response)
    }

    /// Like [`Self::check`], then decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns transport errors, [`ApplicationError::CheckFailed`] and JSON
    /// decoding errors.
    pub async fn check_json(
        &self,
        request: &RequestSpec,
        assertions: impl IntoIterator<Item = Assertion>,
    ) -> ApplicationResult<Value> {
        let response = self.check(request, assertions).await?;
        Ok(response.json()?)
    }

    /// Posts a sub-record to the fixture entry and tracks it in the ledger.
    ///
    /// `assertions` run after the status and non-empty-list checks. Returns
    /// the updated entry and the id of the last record of `kind`. The record
    /// is tracked as soon as a 200 response names its id, even if a later
    /// assertion fails. A record without an id cannot be cleaned up, so it
    /// is logged and left untracked.
    ///
    /// # Errors
    ///
    /// Fails when the request fails or an assertion fails.
    pub async fn create_record<T: Serialize + Sync>(
        &mut self,
        kind: RecordKind,
        payload: &T,
        assertions: impl IntoIterator<Item = Assertion>,
    ) -> ApplicationResult<(Value, Option<String>)> {
        let request =
            RequestSpec::post(self.entry_path(kind.path_segment())).with_payload(payload)?;
        let list = format!("$.{}", kind.entry_field());

        let mut expectations = vec![Assertion::status(200), Assertion::truthy(list)];
        expectations.extend(assertions);

        let response = self.send(&request).await?;
        let id = match response.json() {
            Ok(entry) if response.status == 200 => last_record_id(&entry, kind),
            _ => None,
        };
        // a record that fails verification still exists on the server
        if let Some(id) = &id {
            self.ledger.track(FixtureRecord {
                kind,
                date: self.config.test_date,
                id: id.clone(),
            });
        }
        self.verify(&request.describe(), &response, expectations)?;

        if id.is_none() {
            tracing::warn!(
                request = %request.describe(),
                "created {} has no id, it will not be cleaned up",
                kind.label()
            );
        }
        Ok((response.json()?, id))
    }

    /// Like [`Self::create_record`], but the created record must carry an
    /// id.
    ///
    /// # Errors
    ///
    /// Fails when [`Self::create_record`] fails or the record has no id.
    pub async fn create_identified_record<T: Serialize + Sync>(
        &mut self,
        kind: RecordKind,
        payload: &T,
        assertions: impl IntoIterator<Item = Assertion>,
    ) -> ApplicationResult<(Value, String)> {
        let (entry, id) = self.create_record(kind, payload, assertions).await?;
        let id = id.ok_or_else(|| {
            ApplicationError::check_failed(
                format!("POST {}", self.entry_path(kind.path_segment())),
                format!("created {} has no id", kind.label()),
            )
        })?;
        Ok((entry, id))
    }

    /// Deletes a sub-record of the fixture entry, expecting 200.
    ///
    /// # Errors
    ///
    /// Fails when the request fails or the status is not 200.
    pub async fn delete_record(&mut self, kind: RecordKind, id: &str) -> ApplicationResult<()> {
        self.delete_record_on(self.config.test_date, kind, id).await
    }

    /// Deletes a sub-record of the entry for `date`, expecting 200.
    ///
    /// # Errors
    ///
    /// Fails when the request fails or the status is not 200.
    pub async fn delete_record_on(
        &mut self,
        date: NaiveDate,
        kind: RecordKind,
        id: &str,
    ) -> ApplicationResult<()> {
        let request =
            RequestSpec::delete(entry_path(date, &format!("{}/{id}", kind.path_segment())));
        self.check(&request, [Assertion::status(200)]).await?;
        self.ledger.forget(kind, id);
        Ok(())
    }
}

fn entry_path(date: NaiveDate, suffix: &str) -> String {
    format!("/entries/{}/{suffix}", date.format(DATE_FORMAT))
}

/// Id of the last record of `kind` in a daily entry.
///
/// Ids may come back as strings or numbers; both are normalised to a string.
#[must_use]
pub fn last_record_id(entry: &Value, kind: RecordKind) -> Option<String> {
    let id = entry.get(kind.entry_field())?.as_array()?.last()?.get("id")?;
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(raw: &str) -> NaiveDate {
        kpi_check_domain::parse_date(raw).unwrap()
    }

    #[test]
    fn test_ledger_track_and_forget() {
        let mut ledger = FixtureLedger::new();
        ledger.track(FixtureRecord {
            kind: RecordKind::Booking,
            date: date("2025-06-01"),
            id: "b-1".to_string(),
        });
        ledger.track(FixtureRecord {
            kind: RecordKind::Spin,
            date: date("2025-06-01"),
            id: "b-1".to_string(),
        });

        assert!(ledger.forget(RecordKind::Booking, "b-1"));
        assert!(!ledger.forget(RecordKind::Booking, "b-1"));
        assert_eq!(ledger.pending().len(), 1);
        assert_eq!(ledger.pending()[0].kind, RecordKind::Spin);

        let drained = ledger.drain();
        assert_eq!(drained.len(), 1);
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn test_ledger_keeps_first_calls_count() {
        let mut ledger = FixtureLedger::new();
        ledger.remember_calls(date("2025-06-01"), 37);
        ledger.remember_calls(date("2025-06-01"), 100);

        assert_eq!(ledger.take_original_calls(), Some((date("2025-06-01"), 37)));
        assert_eq!(ledger.take_original_calls(), None);
    }

    #[test]
    fn test_last_record_id() {
        let entry = json!({
            "bookings": [{"id": "first"}, {"id": "second"}],
            "spins": [{"id": 42}],
            "misc_income": [],
        });

        assert_eq!(
            last_record_id(&entry, RecordKind::Booking),
            Some("second".to_string())
        );
        assert_eq!(
            last_record_id(&entry, RecordKind::Spin),
            Some("42".to_string())
        );
        assert_eq!(last_record_id(&entry, RecordKind::Misc), None);
    }

    #[test]
    fn test_entry_path() {
        assert_eq!(
            entry_path(date("2025-06-01"), "spins/abc"),
            "/entries/2025-06-01/spins/abc"
        );
    }
}
