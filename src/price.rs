//! Property price as typed by the user.

use std::fmt;
use std::str::FromStr;

use crate::consts::{MAX_PRICE, MONEY_SCALE};
use crate::prelude::*;

/// Characters accepted as digit grouping between two digits.
const GROUP_SEPARATORS: [char; 4] = [' ', '\u{a0}', '\u{202f}', '\''];

/// Whole-part digits of the largest accepted price, 999 999 999 999 999.
const MAX_PRICE_DIGITS: usize = 15;

/// Characters accepted as the decimal separator.
const DECIMAL_SEPARATORS: [char; 2] = ['.', ','];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("Price is empty")]
    Empty,

    #[error("Price is not a number: {0:?}")]
    Malformed(String),

    #[error("Price has more than {scale} fraction digits: {0:?}", scale = MONEY_SCALE)]
    TooPrecise(String),

    #[error("Price must be below {max}: {0:?}", max = MAX_PRICE)]
    TooLarge(String),

    #[error("Price must be positive: {0:?}")]
    NotPositive(String),
}

/// A positive amount below `MAX_PRICE` with at most two fraction digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// # Errors
    /// `NotPositive` for zero or negative amounts, `TooLarge` from
    /// `MAX_PRICE` up, `TooPrecise` for more than two fraction digits.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount.to_string()));
        }
        if amount >= MAX_PRICE {
            return Err(PriceError::TooLarge(amount.to_string()));
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(PriceError::TooPrecise(amount.to_string()));
        }
        Ok(Self(amount))
    }

    /// Parses `5000000`, `5 000 000`, `5 000 000,50` or `1'250.5`.
    /// Grouping characters are only accepted between two digits.
    ///
    /// # Errors
    /// Any `PriceError` variant; signs, exponents and letters are `Malformed`.
    pub fn parse(text: &str) -> Result<Self, PriceError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let malformed = || PriceError::Malformed(text.to_owned());

        let chars: Vec<char> = trimmed.chars().collect();
        let mut normalized = String::with_capacity(chars.len());
        let mut seen_separator = false;
        for (i, &c) in chars.iter().enumerate() {
            if c.is_ascii_digit() {
                normalized.push(c);
            } else if GROUP_SEPARATORS.contains(&c) {
                let between_digits = !seen_separator
                    && i > 0
                    && chars[i - 1].is_ascii_digit()
                    && chars.get(i + 1).is_some_and(char::is_ascii_digit);
                if !between_digits {
                    return Err(malformed());
                }
            } else if DECIMAL_SEPARATORS.contains(&c) && !seen_separator {
                seen_separator = true;
                normalized.push('.');
            } else {
                return Err(malformed());
            }
        }

        let (whole, fraction) = normalized.split_once('.').unwrap_or((normalized.as_str(), ""));
        if whole.is_empty() || (seen_separator && fraction.is_empty()) {
            return Err(malformed());
        }
        if fraction.len() > MONEY_SCALE as usize {
            return Err(PriceError::TooPrecise(text.to_owned()));
        }
        if whole.trim_start_matches('0').len() > MAX_PRICE_DIGITS {
            return Err(PriceError::TooLarge(text.to_owned()));
        }

        let amount = Decimal::from_str(&normalized).map_err(|_| malformed())?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(text.to_owned()));
        }
        Ok(Self(amount))
    }

    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
