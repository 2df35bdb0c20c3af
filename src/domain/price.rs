//! Fixed-precision recipe price.
//!
//! Prices are non-negative decimals with exactly two fractional digits,
//! stored as minor units (an `i64` count of hundredths) so arithmetic and
//! persistence never touch floating point. The canonical text form always
//! carries two decimals: `"4.50"`, never `"4.5"`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parse failures for [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceParseError {
    #[error("price must not be empty")]
    Empty,
    #[error("price must be a decimal number")]
    Malformed,
    #[error("price must not be negative")]
    Negative,
    #[error("price supports at most 2 decimal places")]
    TooPrecise,
    #[error("price is out of range")]
    OutOfRange,
}

/// Non-negative price with two decimal places of precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(i64);

impl Price {
    /// Construct from a count of minor units (hundredths). Negative counts
    /// clamp to zero; persisted values are constrained non-negative.
    pub fn from_minor_units(minor: i64) -> Self {
        Self(minor.max(0))
    }

    /// Parse a decimal string such as `"4.50"`, `"4.5"`, or `"4"`.
    pub fn parse(raw: &str) -> Result<Self, PriceParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PriceParseError::Empty);
        }
        if let Some(stripped) = raw.strip_prefix('-') {
            // Distinguish "-1.00" from junk like "-abc" for better messages.
            if stripped.chars().any(|c| c.is_ascii_digit()) {
                return Err(PriceParseError::Negative);
            }
            return Err(PriceParseError::Malformed);
        }

        let (whole, frac) = match raw.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (raw, ""),
        };
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(PriceParseError::Malformed);
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(PriceParseError::Malformed);
        }
        if frac.len() > 2 {
            return Err(PriceParseError::TooPrecise);
        }

        let whole: i64 = whole.parse().map_err(|_| PriceParseError::OutOfRange)?;
        let frac_minor = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| PriceParseError::Malformed)? * 10,
            _ => frac.parse::<i64>().map_err(|_| PriceParseError::Malformed)?,
        };
        let minor = whole
            .checked_mul(100)
            .and_then(|units| units.checked_add(frac_minor))
            .ok_or(PriceParseError::OutOfRange)?;
        Ok(Self(minor))
    }

    /// Count of minor units (hundredths) represented by this price.
    pub fn minor_units(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Price {
    type Error = PriceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
