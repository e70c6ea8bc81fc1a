//! KPI Tracker payloads and expected constants.
//!
//! Only request payloads are typed. Responses are checked structurally as
//! JSON so that extra or missing fields surface as assertion failures rather
//! than decode errors.

use serde::{Deserialize, Serialize};

/// Greeting returned by `GET /`.
pub const API_GREETING: &str = "KPI Tracker API";

/// Every field the goals document must carry.
pub const GOAL_FIELDS: [&str; 10] = [
    "profit_daily",
    "spins_daily",
    "profit_biweekly",
    "spins_biweekly",
    "calls_daily",
    "calls_weekly",
    "calls_biweekly",
    "reservations_daily",
    "reservations_weekly",
    "reservations_biweekly",
];

/// Goal thresholds the backend ships with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalTargets {
    /// Daily booking profit target.
    pub profit_daily: f64,
    /// Daily spin bonus target.
    pub spins_daily: f64,
    /// Biweekly booking profit target.
    pub profit_biweekly: f64,
    /// Biweekly spin bonus target.
    pub spins_biweekly: f64,
    /// Daily calls target.
    pub calls_daily: u32,
}

impl GoalTargets {
    /// Values defined by the backend's constants.
    pub const DEFAULT: Self = Self {
        profit_daily: 72.08,
        spins_daily: 74.17,
        profit_biweekly: 865.0,
        spins_biweekly: 890.0,
        calls_daily: 142,
    };

    /// The fixed goals as `(field, value)` pairs.
    #[must_use]
    pub const fn fixed_fields(&self) -> [(&'static str, f64); 4] {
        [
            ("profit_daily", self.profit_daily),
            ("spins_daily", self.spins_daily),
            ("profit_biweekly", self.profit_biweekly),
            ("spins_biweekly", self.spins_biweekly),
        ]
    }
}

/// Partial goals update sent to `PUT /goals`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalsUpdate {
    /// Daily calls target.
    pub calls_daily: u32,
    /// Daily booking profit target.
    pub profit_daily: f64,
}

/// Booking created through `POST /entries/{date}/bookings`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    /// Profit earned on the booking.
    pub profit: f64,
    /// Whether the customer prepaid.
    pub is_prepaid: bool,
    /// Whether refund protection was sold.
    pub has_refund_protection: bool,
    /// Seconds since the previous booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_since_last: Option<u32>,
}

/// Bonus spin created through `POST /entries/{date}/spins`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewSpin {
    /// Bonus amount.
    pub amount: f64,
    /// Whether this was a mega spin.
    pub is_mega: bool,
    /// Booking count that triggered the spin.
    pub booking_number: u32,
}

/// Misc income record created through `POST /entries/{date}/misc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMiscIncome {
    /// Income amount.
    pub amount: f64,
    /// Source label, e.g. `request_lead`.
    pub source: String,
}

/// Sub-records of a daily entry that the checklist creates and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A booking.
    Booking,
    /// A bonus spin.
    Spin,
    /// A misc income record.
    Misc,
}

impl RecordKind {
    /// Collection path segment under `/entries/{date}`.
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::Booking => "bookings",
            Self::Spin => "spins",
            Self::Misc => "misc",
        }
    }

    /// Field of the daily entry that lists these records.
    #[must_use]
    pub const fn entry_field(&self) -> &'static str {
        match self {
            Self::Booking => "bookings",
            Self::Spin => "spins",
            Self::Misc => "misc_income",
        }
    }

    /// Human-readable label used in log lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Spin => "spin",
            Self::Misc => "misc income",
        }
    }
}

/// Sections every biweekly stats document must carry.
pub const BIWEEKLY_STAT_SECTIONS: [&str; 5] =
    ["calls", "reservations", "profit", "spins", "combined"];

/// Sections every daily stats document must carry.
pub const DAILY_STAT_SECTIONS: [&str; 4] = ["calls", "reservations", "profit", "spins"];

/// Fields of `GET /periods/current`.
pub const CURRENT_PERIOD_FIELDS: [&str; 6] = [
    "period_id",
    "start_date",
    "end_date",
    "is_boundary_day",
    "days_remaining",
    "previous_period",
];

/// Fields of an archived period log.
pub const PERIOD_LOG_FIELDS: [&str; 8] = [
    "period_id",
    "start_date",
    "end_date",
    "status",
    "entry_count",
    "totals",
    "goals",
    "goals_met",
];

/// Fields of the legacy migration result.
pub const MIGRATION_FIELDS: [&str; 3] = ["migrated_entries", "periods_created", "message"];

/// Scheduler job that archives closed periods.
pub const PERIOD_ARCHIVER_JOB: &str = "period_archiver";

/// A period id that never exists on the backend.
pub const MISSING_PERIOD_ID: &str = "2025-01-01_to_2025-01-14";
