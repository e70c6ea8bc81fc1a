//! Run settings.
//!
//! Settings are read through a lookup function so that the process
//! environment stays in the binary and tests can pass a plain map.

use chrono::NaiveDate;
use kpi_check_domain::{RequestSpec, parse_date};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::Clock;

/// Explicit API base URL, including the `/api` prefix.
pub const BASE_URL_VAR: &str = "KPI_BASE_URL";
/// Fixture date override.
pub const TEST_DATE_VAR: &str = "KPI_TEST_DATE";
/// Leaves fixtures on the server when truthy.
pub const SKIP_TEARDOWN_VAR: &str = "KPI_SKIP_TEARDOWN";
/// Frontend variables carrying the backend origin, in lookup order.
pub const BACKEND_URL_VARS: [&str; 2] = ["REACT_APP_BACKEND_URL", "EXPO_PUBLIC_BACKEND_URL"];
/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api";

/// Settings of one checklist run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Date used for every entry fixture.
    pub test_date: NaiveDate,
    /// Whether fixtures stay on the server after the run.
    pub skip_teardown: bool,
}

impl Settings {
    /// Builds settings from `lookup`, falling back to `clock` for the date.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Config`] for an unparseable or non-HTTP
    /// base URL, date or flag.
    pub fn from_lookup<F>(lookup: F, clock: &dyn Clock) -> ApplicationResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = value(BASE_URL_VAR)
            .or_else(|| {
                BACKEND_URL_VARS
                    .iter()
                    .find_map(|key| value(*key))
                    .map(|origin| format!("{}/api", origin.trim_end_matches('/')))
            })
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        let url = RequestSpec::get("/")
            .full_url(&base_url)
            .map_err(|e| ApplicationError::Config(format!("{BASE_URL_VAR}: {e}")))?;
        // "localhost:8001/api" parses with "localhost" as its scheme
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApplicationError::Config(format!(
                "{BASE_URL_VAR}: expected an http or https URL, got {base_url}"
            )));
        }

        let test_date = match value(TEST_DATE_VAR) {
            Some(raw) => parse_date(&raw)
                .map_err(|e| ApplicationError::Config(format!("{TEST_DATE_VAR}: {e}")))?,
            None => clock.today(),
        };

        let skip_teardown = match value(SKIP_TEARDOWN_VAR) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ApplicationError::Config(format!("{SKIP_TEARDOWN_VAR}: expected a boolean, got {raw}"))
            })?,
            None => false,
        };

        Ok(Self {
            base_url,
            test_date,
            skip_teardown,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
