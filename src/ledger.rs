//! Ledger models and the raw row parser.
//!
//! Format adapters produce [`RawRow`]s of plain text; [`parse`] turns them
//! into typed [`LedgerEntry`] values. A single malformed row fails the whole
//! batch: rows are never silently skipped.

use crate::error::{AccrualError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Date-only formats accepted for the start date, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Date-time formats whose time of day is discarded.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// One untyped data row as read from the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-indexed source row, counting the header row
    pub row: usize,

    /// Free text label
    pub description: String,

    /// Start date text
    pub date: String,

    /// Principal amount text, `.` as decimal separator
    pub amount: String,
}

impl RawRow {
    pub fn new(
        row: usize,
        description: impl Into<String>,
        date: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        RawRow {
            row,
            description: description.into(),
            date: date.into(),
            amount: amount.into(),
        }
    }

    /// Parses the raw row into a typed ledger entry.
    pub fn parse(&self) -> Result<LedgerEntry> {
        let start_date = parse_date(&self.date).ok_or_else(|| AccrualError::InvalidRow {
            row: self.row,
            message: format!("unparsable date '{}'", self.date),
        })?;

        let principal = parse_amount(&self.amount).ok_or_else(|| AccrualError::InvalidRow {
            row: self.row,
            message: format!("unparsable amount '{}'", self.amount),
        })?;

        Ok(LedgerEntry {
            description: self.description.clone(),
            start_date,
            principal,
        })
    }
}

/// A principal amount and the date from which it compounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Label copied verbatim into every accrual point
    pub description: String,

    /// First day of the first period
    pub start_date: NaiveDate,

    /// Opening balance. May be negative.
    pub principal: Decimal,
}

impl LedgerEntry {
    pub fn new(description: impl Into<String>, start_date: NaiveDate, principal: Decimal) -> Self {
        LedgerEntry {
            description: description.into(),
            start_date,
            principal,
        }
    }
}

/// Parses every raw row, failing on the first malformed one.
pub fn parse(rows: &[RawRow]) -> Result<Vec<LedgerEntry>> {
    let entries = rows.iter().map(RawRow::parse).collect::<Result<Vec<_>>>()?;
    debug!("Parsed {} ledger entries", entries.len());
    Ok(entries)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
