//! Fixed-point display amount with 2 decimal places.
//!
//! Balances are carried at full `rust_decimal` precision inside the engine
//! and only converted to `Decimal2` when a point is emitted.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A decimal amount rounded to exactly 2 decimal places.
///
/// Rounding is half-to-even, so `0.125` becomes `0.12` and `0.135` becomes
/// `0.14`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use interest_accrual::Decimal2;
///
/// let amount = Decimal2::from_str("1004.246575").unwrap();
/// assert_eq!(amount.to_string(), "1004.25");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Decimal2(Decimal);

impl Decimal2 {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Creates a new `Decimal2` from a `Decimal`, rounding to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(Self::SCALE);
        Decimal2(rounded)
    }

    /// Returns the underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for spreadsheet cells, which only hold floats.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl From<Decimal> for Decimal2 {
    fn from(value: Decimal) -> Self {
        Decimal2::new(value)
    }
}

impl FromStr for Decimal2 {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Decimal2::new(decimal))
    }
}

impl fmt::Display for Decimal2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Decimal2 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}
