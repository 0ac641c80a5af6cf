//! Compound interest accrual engine.
//!
//! Projects each ledger entry forward one period at a time, prorating a
//! fixed annual rate by the exact number of days in the period, until the
//! next period end would no longer lie in the past.

use crate::clock::{Clock, SystemClock};
use crate::decimal::Decimal2;
use crate::ledger::LedgerEntry;
use crate::period::PeriodStrategy;
use chrono::NaiveTime;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

/// Days per year used to derive the daily rate.
const DAYS_PER_YEAR: u32 = 365;

/// Format of [`AccrualPoint::period_end_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Balance of one ledger entry at the end of one completed period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccrualPoint {
    /// Copied from the originating ledger entry
    pub description: String,

    /// Period boundary as `yyyy-MM-dd`
    pub period_end_date: String,

    /// Principal plus all interest up to this period, rounded for display
    pub balance: Decimal2,
}

/// The interest accrual engine.
///
/// Entries are independent and processed in input order, so all points of
/// one entry precede all points of the next.
///
/// # Rounding
///
/// Only emitted balances are rounded. Interest for the next period is
/// computed on the unrounded running balance.
pub struct AccrualEngine<C = SystemClock> {
    /// Decimal fraction, e.g. 0.05 for 5%
    annual_rate: Decimal,
    period: PeriodStrategy,
    clock: C,
}

impl AccrualEngine {
    /// Creates an engine with calendar-month periods and the system clock.
    ///
    /// `annual_rate` is a fraction, already divided by 100.
    pub fn new(annual_rate: Decimal) -> Self {
        AccrualEngine {
            annual_rate,
            period: PeriodStrategy::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> AccrualEngine<C> {
    /// Replaces the period advancement strategy.
    pub fn with_period(mut self, period: PeriodStrategy) -> Self {
        self.period = period;
        self
    }

    /// Replaces the source of "now".
    pub fn with_clock<D: Clock>(self, clock: D) -> AccrualEngine<D> {
        AccrualEngine {
            annual_rate: self.annual_rate,
            period: self.period,
            clock,
        }
    }

    /// Projects every entry and concatenates the results in entry order.
    pub fn accrue(&self, entries: &[LedgerEntry]) -> Vec<AccrualPoint> {
        let daily_rate = self.annual_rate / Decimal::from(DAYS_PER_YEAR);

        let mut points = Vec::new();
        for entry in entries {
            self.accrue_entry(entry, daily_rate, &mut points);
        }
        points
    }

    /// Emits one point per period of `entry` that ended before now.
    fn accrue_entry(&self, entry: &LedgerEntry, daily_rate: Decimal, out: &mut Vec<AccrualPoint>) {
        // Sampled once so every period of this entry sees the same cutoff
        let now = self.clock.now();

        let mut balance = entry.principal;
        let mut cursor = entry.start_date;
        let mut periods = 0usize;

        while let Some(next) = self.period.advance(cursor) {
            if next.and_time(NaiveTime::MIN) >= now {
                break;
            }

            let period_days = (next - cursor).num_days();
            let accrued = balance * daily_rate * Decimal::from(period_days);
            balance += accrued;

            out.push(AccrualPoint {
                description: entry.description.clone(),
                period_end_date: next.format(DATE_FORMAT).to_string(),
                balance: Decimal2::new(balance),
            });

            cursor = next;
            periods += 1;
        }

        debug!(
            "Entry '{}' from {}: {} periods, closing balance {}",
            entry.description,
            entry.start_date,
            periods,
            Decimal2::new(balance)
        );
    }
}

/// Projects `entries` with calendar-month periods up to the current time.
pub fn accrue(entries: &[LedgerEntry], annual_rate: Decimal) -> Vec<AccrualPoint> {
    AccrualEngine::new(annual_rate).accrue(entries)
}
