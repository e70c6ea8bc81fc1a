//! Environment-backed configuration.
//!
//! Variables come from the process environment after an optional `.env`
//! file has been loaded. Values already present in the environment win over
//! the file.

use std::path::{Path, PathBuf};

use kpi_check_application::ports::Clock;
use kpi_check_application::{ApplicationResult, Settings};

/// Variable reported by the environment probe.
pub const PROBE_VAR: &str = "MONGO_URL";

/// Loads `./.env` if present, then reads the run settings.
///
/// # Errors
///
/// Returns a configuration error for unparseable values.
pub fn settings_from_env(clock: &dyn Clock) -> ApplicationResult<Settings> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }
    Settings::from_lookup(|key| std::env::var(key).ok(), clock)
}

/// State of the `.env` file the probe looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    /// The file was read.
    Loaded,
    /// No file at the path.
    Missing,
    /// The file exists but could not be parsed.
    Invalid(String),
}

/// What the environment probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvProbe {
    /// Absolute path of the `.env` file.
    pub path: PathBuf,
    /// Whether the file could be read.
    pub status: EnvFileStatus,
    /// Effective value of the probed variable.
    pub value: Option<String>,
}

impl EnvProbe {
    /// Reads `key` as it would be seen after loading `path`.
    ///
    /// The process environment is not modified.
    #[must_use]
    pub fn inspect(path: &Path, key: &str) -> Self {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let (status, from_file) = read_key(&path, key);
        let value = std::env::var(key).ok().or(from_file);
        Self {
            path,
            status,
            value,
        }
    }

    /// `KEY = value` line, with `<unset>` for a missing value.
    #[must_use]
    pub fn value_line(&self, key: &str) -> String {
        format!("{key} = {}", self.value.as_deref().unwrap_or("<unset>"))
    }
}

fn read_key(path: &Path, key: &str) -> (EnvFileStatus, Option<String>) {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return (EnvFileStatus::Missing, None),
        Err(e) => return (EnvFileStatus::Invalid(e.to_string()), None),
    };

    let mut value = None;
    for entry in entries {
        match entry {
            Ok((name, v)) if name == key => value = Some(v),
            Ok(_) => {}
            Err(e) => return (EnvFileStatus::Invalid(e.to_string()), value),
        }
    }
    (EnvFileStatus::Loaded, value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const KEY: &str = "KPI_CHECK_PROBE_TEST_URL";

    #[test]
    fn test_probe_reads_value_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            format!("# backend\n{KEY}=mongodb://localhost:27017\nDB_NAME=kpi\n"),
        )
        .unwrap();

        let probe = EnvProbe::inspect(&path, KEY);

        assert_eq!(probe.status, EnvFileStatus::Loaded);
        assert!(probe.path.is_absolute());
        assert_eq!(probe.value.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(
            probe.value_line(KEY),
            format!("{KEY} = mongodb://localhost:27017")
        );
    }

    #[test]
    fn test_probe_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let probe = EnvProbe::inspect(&dir.path().join(".env"), KEY);

        assert_eq!(probe.status, EnvFileStatus::Missing);
        assert_eq!(probe.value, None);
        assert_eq!(probe.value_line(KEY), format!("{KEY} = <unset>"));
    }

    #[test]
    fn test_probe_file_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "DB_NAME=kpi\n").unwrap();

        let probe = EnvProbe::inspect(&path, KEY);
        assert_eq!(probe.status, EnvFileStatus::Loaded);
        assert_eq!(probe.value, None);
    }
}
