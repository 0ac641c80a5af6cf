//! Period advancement strategies for the accrual engine.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// How far the engine moves the cursor date for each compounding period.
///
/// Serialized as `"calendar-month"` or `{ "fixed-days": 30 }`. A zero-day
/// period is rejected when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodStrategy {
    /// One calendar month. Days past the end of the target month clamp to
    /// its last day, so 01-31 advances to 02-28 (or 02-29).
    #[default]
    CalendarMonth,

    /// A fixed, non-zero number of days.
    FixedDays(NonZeroU32),
}

impl PeriodStrategy {
    /// Fixed-day periods; `None` for zero days.
    pub fn fixed_days(days: u32) -> Option<Self> {
        NonZeroU32::new(days).map(PeriodStrategy::FixedDays)
    }

    /// Returns the end of the period starting at `from`.
    ///
    /// `None` when the result falls outside the representable date range.
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        match *self {
            PeriodStrategy::CalendarMonth => from.checked_add_months(Months::new(1)),
            PeriodStrategy::FixedDays(days) => {
                from.checked_add_signed(Duration::days(i64::from(days.get())))
            }
        }
    }
}
