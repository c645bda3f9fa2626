//! Calendar dates in the fixed `DD.MM.YYYY` text form.
//!
//! Parsing is strict: exactly two digits for the day, two for the month and
//! four for the year, separated by dots, with nothing around them. Day counts
//! are pure civil-calendar distances and never go through clocks or offsets.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::consts::{DATE_SEPARATOR, DATE_TEXT_LEN};
use crate::prelude::*;
use crate::types::{Month, Year};

/// Byte offsets of the two separators in `DD.MM.YYYY`.
const SEPARATOR_POSITIONS: [usize; 2] = [2, 5];

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format (expected DD.MM.YYYY): {_0:?}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {_0}")]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {_0}")]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day:02} for month {month:02}.{year:04}")]
    InvalidDay { day: u8, month: u8, year: u16 },
}

impl std::error::Error for DateError {}

impl DateError {
    /// `true` when the text did not match the pattern at all, `false` when it
    /// matched but named a date that does not exist.
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidFormat(_))
    }
}

/// A day in the civil calendar, without time of day or time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Builds a date from its numeric components.
    ///
    /// # Errors
    /// Returns the matching `DateError` variant when the year, the month or
    /// the day is out of range.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        Self::from_parts(year, month, day)
    }

    /// The calendar decides whether `day` exists in that month.
    fn from_parts(year: Year, month: Month, day: u8) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(i32::from(year.get()), u32::from(month.get()), u32::from(day))
            .map(Self)
            .ok_or(DateError::InvalidDay {
                day,
                month: month.get(),
                year: year.get(),
            })
    }

    /// Parses `DD.MM.YYYY` and nothing else.
    ///
    /// # Errors
    /// `DateError::InvalidFormat` when the text does not match the pattern;
    /// `InvalidYear`, `InvalidMonth` or `InvalidDay` when it matches but the
    /// numbers do not form a real date (e.g. `31.02.2024`).
    pub fn parse_strict(text: &str) -> Result<Self, DateError> {
        let bytes = text.as_bytes();
        let well_formed = bytes.len() == DATE_TEXT_LEN
            && bytes.iter().enumerate().all(|(i, b)| {
                if SEPARATOR_POSITIONS.contains(&i) {
                    char::from(*b) == DATE_SEPARATOR
                } else {
                    b.is_ascii_digit()
                }
            });
        if !well_formed {
            return Err(DateError::InvalidFormat(text.to_owned()));
        }

        let day = digits(&bytes[0..2]);
        let month = digits(&bytes[3..5]);
        let year = digits(&bytes[6..10]);

        let narrow = |n: u16| u8::try_from(n).map_err(|_| DateError::InvalidFormat(text.to_owned()));

        let year = Year::new(year)?;
        let month = Month::new(narrow(month)?)?;
        Self::from_parts(year, month, narrow(day)?)
    }

    /// Four-digit year, `1..=9999`.
    pub fn year(&self) -> u16 {
        // Construction keeps the year inside 1..=9999.
        u16::try_from(self.0.year()).unwrap_or_default()
    }

    /// Month number, `1..=12`.
    pub fn month(&self) -> u8 {
        u8::try_from(self.0.month()).unwrap_or_default()
    }

    /// Day of the month.
    pub fn day(&self) -> u8 {
        u8::try_from(self.0.day()).unwrap_or_default()
    }

    /// The day before, if it is still representable.
    pub fn previous_day(&self) -> Option<Self> {
        self.0.pred_opt().map(Self).filter(|d| Year::new(d.year()).is_ok())
    }

    /// The day after, if it is still representable.
    pub fn next_day(&self) -> Option<Self> {
        self.0.succ_opt().map(Self).filter(|d| Year::new(d.year()).is_ok())
    }

    /// Signed number of whole days from `self` to `later`.
    pub fn days_until(&self, later: &Self) -> i64 {
        days_between(*self, *later)
    }
}

/// Folds ASCII digits into a number. Callers have already checked the bytes.
fn digits(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u16::from(b - b'0'))
}

/// Signed count of whole calendar days from `a` to `b`; positive when `b` is
/// later.
pub fn days_between(a: CalendarDate, b: CalendarDate) -> i64 {
    b.0.signed_duration_since(a.0).num_days()
}

/// `max(n, 0)` as an unsigned day count.
pub const fn max_clamped_non_negative(n: i64) -> u64 {
    if n < 0 { 0 } else { n.unsigned_abs() }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day(), self.month(), self.year())
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_strict(s)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
