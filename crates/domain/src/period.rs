//! Biweekly period identifiers.
//!
//! The API names every period by its inclusive date window, e.g.
//! `2025-01-01_to_2025-01-14`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{DomainError, DomainResult};

/// Separator between the start and end dates of a period id.
pub const PERIOD_SEPARATOR: &str = "_to_";

/// Date format used by the API for days and period bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A period id such as `2025-01-01_to_2025-01-14`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodId {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodId {
    /// Creates a period from its inclusive bounds.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPeriodId`] if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::InvalidPeriodId {
                id: format_id(start, end),
                reason: "end date precedes start date".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// First day of the period.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn format_id(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}{PERIOD_SEPARATOR}{}",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    )
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDate`] if `raw` is not a calendar date in
/// that exact layout.
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    // chrono accepts unpadded fields, the API never sends them
    if raw.len() != 10 {
        return Err(DomainError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| DomainError::InvalidDate(raw.to_string()))
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_id(self.start, self.end))
    }
}

impl FromStr for PeriodId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let invalid = |reason: &str| DomainError::InvalidPeriodId {
            id: s.to_string(),
            reason: reason.to_string(),
        };

        let (start, end) = s
            .split_once(PERIOD_SEPARATOR)
            .ok_or_else(|| invalid("missing '_to_' separator"))?;
        let start = parse_date(start).map_err(|_| invalid("start is not a YYYY-MM-DD date"))?;
        let end = parse_date(end).map_err(|_| invalid("end is not a YYYY-MM-DD date"))?;

        Self::new(start, end).map_err(|_| invalid("end date precedes start date"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let period: PeriodId = "2025-01-01_to_2025-01-14".parse().unwrap();
        assert_eq!(period.start(), date("2025-01-01"));
        assert_eq!(period.end(), date("2025-01-14"));
        assert_eq!(period.to_string(), "2025-01-01_to_2025-01-14");
    }

    #[test]
    fn test_contains_both_bounds() {
        let period: PeriodId = "2025-01-01_to_2025-01-14".parse().unwrap();
        assert!(period.contains(date("2025-01-01")));
        assert!(period.contains(date("2025-01-14")));
        assert!(!period.contains(date("2025-01-15")));
        assert!(!period.contains(date("2024-12-31")));
    }

    #[test]
    fn test_rejects_missing_separator() {
        let err = "2025-01-01-2025-01-14".parse::<PeriodId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidPeriodId { .. }));
    }

    #[test]
    fn test_rejects_reversed_window() {
        let err = "2025-01-14_to_2025-01-01".parse::<PeriodId>().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidPeriodId {
                id: "2025-01-14_to_2025-01-01".to_string(),
                reason: "end date precedes start date".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_bad_dates() {
        assert!("2025-02-30_to_2025-03-01".parse::<PeriodId>().is_err());
        assert!("2025-1-1_to_2025-01-14".parse::<PeriodId>().is_err());
        assert!(parse_date("2025-6-1").is_err());
    }
}
