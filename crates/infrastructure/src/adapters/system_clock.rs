//! System clock adapter

use chrono::{Local, NaiveDate};
use kpi_check_application::ports::Clock;

/// System clock implementation using the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock::new();
        let today = clock.today();
        assert_eq!(today, Local::now().date_naive());
    }
}
