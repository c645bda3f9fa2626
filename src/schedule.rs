//! Central-bank key rate history and rate lookup by date.
//!
//! A [`RateSchedule`] is an ordered table of rate intervals. Validated
//! schedules are contiguous and non-overlapping, so at most one interval can
//! contain a given date. Manually curated data that breaks those rules can
//! still be loaded with [`RateSchedule::lenient`]; lookups then prefer the
//! narrowest matching interval and, among equally narrow ones, the one added
//! last.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use rust_decimal_macros::dec;
use tracing::warn;

use crate::consts::MAX_RATE_PERCENT;
use crate::date::{CalendarDate, days_between};
use crate::prelude::*;

/// Bank of Russia key rate decisions: first day in force and rate in percent.
/// Each rate stays in force until the day before the next decision.
const BUILTIN_KEY_RATES: &[((u16, u8, u8), Decimal)] = &[
    ((2019, 6, 17), dec!(7.50)),
    ((2019, 7, 29), dec!(7.25)),
    ((2019, 9, 9), dec!(7.00)),
    ((2019, 10, 28), dec!(6.50)),
    ((2019, 12, 16), dec!(6.25)),
    ((2020, 2, 10), dec!(6.00)),
    ((2020, 4, 27), dec!(5.50)),
    ((2020, 6, 22), dec!(4.50)),
    ((2020, 7, 27), dec!(4.25)),
    ((2021, 3, 22), dec!(4.50)),
    ((2021, 4, 26), dec!(5.00)),
    ((2021, 6, 15), dec!(5.50)),
    ((2021, 7, 26), dec!(6.50)),
    ((2021, 9, 13), dec!(6.75)),
    ((2021, 10, 25), dec!(7.50)),
    ((2021, 12, 20), dec!(8.50)),
    ((2022, 2, 14), dec!(9.50)),
    ((2022, 2, 28), dec!(20.00)),
    ((2022, 4, 11), dec!(17.00)),
    ((2022, 5, 4), dec!(14.00)),
    ((2022, 5, 27), dec!(11.00)),
    ((2022, 6, 14), dec!(9.50)),
    ((2022, 7, 25), dec!(8.00)),
    ((2022, 9, 19), dec!(7.50)),
    ((2023, 7, 24), dec!(8.50)),
    ((2023, 8, 15), dec!(12.00)),
    ((2023, 9, 18), dec!(13.00)),
    ((2023, 10, 30), dec!(15.00)),
    ((2023, 12, 18), dec!(16.00)),
    ((2024, 7, 29), dec!(18.00)),
    ((2024, 9, 16), dec!(19.00)),
    ((2024, 10, 28), dec!(21.00)),
    ((2025, 6, 9), dec!(20.00)),
    ((2025, 7, 28), dec!(18.00)),
    ((2025, 9, 15), dec!(17.00)),
    ((2025, 10, 27), dec!(16.50)),
];

static BUILTIN: LazyLock<RateSchedule> = LazyLock::new(builtin_schedule);

#[allow(clippy::expect_used)]
fn builtin_schedule() -> RateSchedule {
    builtin_steps()
        .and_then(|steps| RateSchedule::from_steps(&steps).ok())
        .expect("built-in key rate table is valid")
}

/// The built-in key rate decisions as typed `(first day, rate)` pairs.
pub(crate) fn builtin_steps() -> Option<Vec<(CalendarDate, Decimal)>> {
    BUILTIN_KEY_RATES
        .iter()
        .map(|&((y, m, d), rate)| CalendarDate::from_ymd(y, m, d).ok().map(|since| (since, rate)))
        .collect()
}

/// Error type for rate table construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Rate interval starting {start} ends before it starts ({end})")]
    InvertedInterval { start: CalendarDate, end: CalendarDate },

    #[error("Negative rate {rate}% for interval starting {start}")]
    NegativeRate { start: CalendarDate, rate: Decimal },

    #[error("Rate {rate}% for interval starting {start} is above {max}%", max = MAX_RATE_PERCENT)]
    RateTooHigh { start: CalendarDate, rate: Decimal },

    #[error("Rate intervals {first} and {second} overlap")]
    Overlap { first: RateInterval, second: RateInterval },

    #[error("Rate table has a gap between {after} and {before}")]
    Gap { after: CalendarDate, before: CalendarDate },

    #[error("Open-ended rate interval starting {start} is not the last one")]
    OpenEndedNotLast { start: CalendarDate },

    #[error("Two rate decisions take effect on {0}")]
    DuplicateStart(CalendarDate),
}

/// A rate in force from `start` through `end`, or indefinitely when `end` is
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateInterval {
    start:        CalendarDate,
    end:          Option<CalendarDate>,
    rate_percent: Decimal,
}

impl RateInterval {
    /// # Errors
    /// `InvertedInterval` when `end < start`, `NegativeRate` for a rate
    /// below zero, `RateTooHigh` above `MAX_RATE_PERCENT`.
    pub fn new(
        start: CalendarDate,
        end: Option<CalendarDate>,
        rate_percent: Decimal,
    ) -> Result<Self, ScheduleError> {
        if let Some(end) = end {
            if end < start {
                return Err(ScheduleError::InvertedInterval { start, end });
            }
        }
        if rate_percent < Decimal::ZERO {
            return Err(ScheduleError::NegativeRate {
                start,
                rate: rate_percent,
            });
        }
        if rate_percent > MAX_RATE_PERCENT {
            return Err(ScheduleError::RateTooHigh {
                start,
                rate: rate_percent,
            });
        }
        Ok(Self {
            start,
            end,
            rate_percent,
        })
    }

    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    pub const fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    pub const fn rate_percent(&self) -> Decimal {
        self.rate_percent
    }

    pub const fn is_open_ended(&self) -> bool {
        self.end.is_none()
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && self.end.is_none_or(|end| date <= end)
    }

    /// Narrower intervals order first; open-ended ones are the widest.
    fn cmp_width(&self, other: &Self) -> Ordering {
        let width = |i: &Self| i.end.map(|end| days_between(i.start, end));
        match (width(self), width(other)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for RateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}..{}] {}%", self.start, end, self.rate_percent),
            None => write!(f, "[{}..] {}%", self.start, self.rate_percent),
        }
    }
}

/// Something that can tell which key rate was in force on a date.
pub trait RateSource {
    /// The rate in percent, or `None` when the date is not covered.
    fn rate_in_effect_on(&self, date: CalendarDate) -> Option<Decimal>;
}

impl<T: RateSource + ?Sized> RateSource for &T {
    fn rate_in_effect_on(&self, date: CalendarDate) -> Option<Decimal> {
        (**self).rate_in_effect_on(date)
    }
}

/// Immutable table of key rate intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateSchedule {
    intervals: Vec<RateInterval>,
}

impl RateSchedule {
    /// Sorts the intervals by start date and checks that they are contiguous:
    /// no overlaps, no gaps, and only the last one may be open-ended.
    ///
    /// # Errors
    /// The first `Overlap`, `Gap` or `OpenEndedNotLast` violation found.
    pub fn new(mut intervals: Vec<RateInterval>) -> Result<Self, ScheduleError> {
        intervals.sort_by_key(RateInterval::start);

        for pair in intervals.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let Some(prev_end) = prev.end else {
                return Err(ScheduleError::OpenEndedNotLast { start: prev.start });
            };
            if prev_end >= next.start {
                return Err(ScheduleError::Overlap {
                    first:  prev,
                    second: next,
                });
            }
            if prev_end.next_day() != Some(next.start) {
                return Err(ScheduleError::Gap {
                    after:  prev_end,
                    before: next.start,
                });
            }
        }

        Ok(Self { intervals })
    }

    /// Keeps the intervals in the order given, accepting overlaps and gaps.
    /// Each accepted anomaly is logged.
    pub fn lenient(intervals: Vec<RateInterval>) -> Self {
        for (i, a) in intervals.iter().enumerate() {
            for b in &intervals[i + 1..] {
                let overlap = a.contains(b.start) || b.contains(a.start);
                if overlap {
                    warn!(first = %a, second = %b, "rate intervals overlap");
                }
            }
        }

        let mut sorted = intervals.clone();
        sorted.sort_by_key(RateInterval::start);
        for pair in sorted.windows(2) {
            if let Some(end) = pair[0].end {
                if end < pair[1].start && end.next_day() != Some(pair[1].start) {
                    warn!(after = %end, before = %pair[1].start, "gap in rate table");
                }
            }
        }

        Self { intervals }
    }

    /// Builds a contiguous schedule from rate decisions: each rate stays in
    /// force until the day before the next one, the last rate indefinitely.
    ///
    /// # Errors
    /// `DuplicateStart` when two decisions share a date, `NegativeRate` for a
    /// rate below zero.
    pub fn from_steps(steps: &[(CalendarDate, Decimal)]) -> Result<Self, ScheduleError> {
        let mut steps = steps.to_vec();
        steps.sort_by_key(|&(since, _)| since);

        let mut intervals = Vec::with_capacity(steps.len());
        for (i, &(since, rate)) in steps.iter().enumerate() {
            let end = match steps.get(i + 1) {
                Some(&(next, _)) if next == since => return Err(ScheduleError::DuplicateStart(next)),
                Some(&(next, _)) => Some(next.previous_day().ok_or(ScheduleError::DuplicateStart(next))?),
                None => None,
            };
            intervals.push(RateInterval::new(since, end, rate)?);
        }

        Self::new(intervals)
    }

    /// The embedded key rate history, from 17.06.2019 onward.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn intervals(&self) -> &[RateInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// First day covered by the table.
    pub fn earliest(&self) -> Option<CalendarDate> {
        self.intervals.iter().map(RateInterval::start).min()
    }

    /// The rate of the interval containing `date`, or `None` when no interval
    /// covers it.
    pub fn rate_in_effect_on(&self, date: CalendarDate) -> Option<Decimal> {
        self.interval_on(date).map(RateInterval::rate_percent)
    }

    /// The interval in force on `date`: the narrowest match, and among equally
    /// narrow matches the one added last.
    pub fn interval_on(&self, date: CalendarDate) -> Option<&RateInterval> {
        self.intervals
            .iter()
            .enumerate()
            .filter(|(_, interval)| interval.contains(date))
            .min_by(|(ia, a), (ib, b)| a.cmp_width(b).then_with(|| ib.cmp(ia)))
            .map(|(_, interval)| interval)
    }
}

impl RateSource for RateSchedule {
    fn rate_in_effect_on(&self, date: CalendarDate) -> Option<Decimal> {
        Self::rate_in_effect_on(self, date)
    }
}
