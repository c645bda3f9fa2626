use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    PERIOD_SEPARATOR,
    date::{CalendarDate, DateError, days_between, max_clamped_non_negative},
    prelude::*,
};

/// A closed interval of calendar dates.
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{}{}{}", start, PERIOD_SEPARATOR, end)]
pub struct DatePeriod {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Error type for date period operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Start date is after end date.
    #[error("Invalid period: start ({start}) is after end ({end})")]
    Inverted { start: CalendarDate, end: CalendarDate },

    /// Error parsing one of the bounds.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Invalid period format.
    #[error("Invalid period format: {0}")]
    InvalidFormat(String),
}

impl DatePeriod {
    /// Creates a new period with validation.
    ///
    /// # Errors
    /// Returns `PeriodError::Inverted` if start > end.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first day of the period
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Returns the last day of the period
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Checks if the period contains a given date (both bounds inclusive)
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Checks if this period shares at least one day with another
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The days common to both periods, if any
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        Self::new(start, end).ok()
    }

    /// Whole days of `[from, to]` that fall inside this period, counted as the
    /// distance between the clipped bounds. A delay that merely touches the
    /// period on one day contributes nothing; disjoint intervals contribute
    /// zero rather than a negative count.
    pub fn overlap_days(&self, from: CalendarDate, to: CalendarDate) -> u64 {
        let overlap_start = from.max(self.start);
        let overlap_end = to.min(self.end);
        max_clamped_non_negative(days_between(overlap_start, overlap_end))
    }

    /// Number of days from the first to the last day of the period.
    pub fn span_days(&self) -> u64 {
        max_clamped_non_negative(days_between(self.start, self.end))
    }
}

impl FromStr for DatePeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(PERIOD_SEPARATOR).count();

        match separator_count {
            0 => Err(PeriodError::InvalidFormat(format!(
                "No period separator found (expected '{PERIOD_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(PERIOD_SEPARATOR).ok_or_else(|| {
                    PeriodError::InvalidFormat(format!("Separator '{PERIOD_SEPARATOR}' not found despite count == 1"))
                })?;

                let start = start_str.trim().parse::<CalendarDate>()?;
                let end = end_str.trim().parse::<CalendarDate>()?;

                Self::new(start, end)
            },
            _ => Err(PeriodError::InvalidFormat(format!(
                "Too many '{PERIOD_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for DatePeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DatePeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare start dates first, then end dates
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

/// Serialized as `{"start": "DD.MM.YYYY", "end": "DD.MM.YYYY"}`.
#[derive(Serialize, Deserialize)]
struct RawPeriod {
    start: CalendarDate,
    end:   CalendarDate,
}

impl Serialize for DatePeriod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RawPeriod {
            start: self.start,
            end:   self.end,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DatePeriod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawPeriod::deserialize(deserializer)?;
        Self::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
