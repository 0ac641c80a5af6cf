//! # Interest Accrual
//!
//! Projects compound interest for a ledger of dated principal amounts, one
//! period at a time, up to the present date.
//!
//! ## Design Principles
//!
//! - **Decimal arithmetic**: balances use `rust_decimal`, never floats
//! - **Display-only rounding**: emitted balances have 2 decimal places, the
//!   running balance keeps full precision
//! - **Fail loudly**: one malformed row aborts the run before anything is written
//! - **Deterministic output**: entry order first, then chronological
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use interest_accrual::{AccrualEngine, FixedClock, LedgerEntry};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let now = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let entries = vec![LedgerEntry::new("Loan A", start, Decimal::from(1000))];
//!
//! let points = AccrualEngine::new(Decimal::from_str("0.05").unwrap())
//!     .with_clock(FixedClock(now))
//!     .accrue(&entries);
//!
//! assert_eq!(points[0].period_end_date, "2023-02-01");
//! assert_eq!(points[0].balance.to_string(), "1004.25");
//! ```

pub mod clock;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod format;
pub mod ledger;
pub mod period;
pub mod pipeline;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{resolve_output_path, RuntimeConfig, DEFAULT_CONFIG_FILE};
pub use decimal::Decimal2;
pub use engine::{accrue, AccrualEngine, AccrualPoint};
pub use error::{AccrualError, Result};
pub use format::{format_for_path, DelimitedText, Spreadsheet, TabularFormat};
pub use ledger::{LedgerEntry, RawRow};
pub use period::PeriodStrategy;
pub use pipeline::{run, run_with_clock};
