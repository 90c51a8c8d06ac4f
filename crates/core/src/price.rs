//! Fixed-point monetary amount.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_object::ValueObject;

/// Number of fractional decimal digits a `Price` carries.
pub const PRICE_SCALE_DIGITS: u32 = 6;

const MICROS_PER_UNIT: u64 = 10u64.pow(PRICE_SCALE_DIGITS);

/// A price string could not be turned into a `Price`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,

    #[error("price cannot be negative: {0}")]
    Negative(String),

    #[error("price is not a decimal number: {0}")]
    Malformed(String),

    #[error("price has more than {} fractional digits: {0}", PRICE_SCALE_DIGITS)]
    TooPrecise(String),

    #[error("price is too large: {0}")]
    Overflow(String),
}

/// Non-negative price in micro-units (millionths of a currency unit).
///
/// Stored and serialized as the integer micro-unit count, so a save/load cycle can
/// never drift the way a binary float would.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl ValueObject for Price {}

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Arithmetic mean of `prices`, rounded half-up to the nearest micro-unit.
    ///
    /// Returns `Price::ZERO` for an empty input.
    pub fn mean<I>(prices: I) -> Price
    where
        I: IntoIterator<Item = Price>,
    {
        let (sum, count) = prices
            .into_iter()
            .fold((0u128, 0u128), |(sum, count), p| (sum + p.0 as u128, count + 1));

        if count == 0 {
            return Price::ZERO;
        }

        // The mean never exceeds the largest input, so it fits back into u64.
        let rounded = (sum * 2 + count) / (count * 2);
        Price(rounded as u64)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let whole = self.0 / MICROS_PER_UNIT;
        let frac = self.0 % MICROS_PER_UNIT;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:0width$}", width = PRICE_SCALE_DIGITS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(PriceError::Empty);
        }
        if raw.starts_with('-') {
            return Err(PriceError::Negative(raw.to_string()));
        }

        let (whole, frac) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(PriceError::Malformed(raw.to_string()));
        }
        if raw.contains('.') && frac.is_empty() {
            return Err(PriceError::Malformed(raw.to_string()));
        }
        if frac.len() > PRICE_SCALE_DIGITS as usize {
            return Err(PriceError::TooPrecise(raw.to_string()));
        }

        let overflow = || PriceError::Overflow(raw.to_string());
        let whole: u64 = whole.parse().map_err(|_| overflow())?;
        let frac_micros: u64 = if frac.is_empty() {
            0
        } else {
            let padding = PRICE_SCALE_DIGITS - frac.len() as u32;
            let value: u64 = frac.parse().map_err(|_| PriceError::Malformed(raw.to_string()))?;
            value * 10u64.pow(padding)
        };

        let micros = whole
            .checked_mul(MICROS_PER_UNIT)
            .and_then(|m| m.checked_add(frac_micros))
            .ok_or_else(overflow)?;

        Ok(Price(micros))
    }
}
