//! Range-checked date components.
//!
//! Only the year and the month are checked here. Whether a day exists in a
//! given month is left to the calendar itself (see
//! [`CalendarDate`](crate::date::CalendarDate)).

use std::fmt;
use std::num::{NonZeroU8, NonZeroU16};

use crate::consts::{MAX_MONTH, MAX_YEAR, MIN_YEAR};
use crate::date::DateError;

/// Calendar year in `MIN_YEAR..=MAX_YEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(NonZeroU16);

impl Year {
    /// # Errors
    /// `DateError::InvalidYear` for 0 and for anything past `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, DateError> {
        NonZeroU16::new(value)
            .filter(|_| (MIN_YEAR..=MAX_YEAR).contains(&value))
            .map(Self)
            .ok_or(DateError::InvalidYear(value))
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.get())
    }
}

/// Month number in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NonZeroU8);

impl Month {
    /// # Errors
    /// `DateError::InvalidMonth` for 0 and for anything past December.
    pub fn new(value: u8) -> Result<Self, DateError> {
        NonZeroU8::new(value)
            .filter(|_| value <= MAX_MONTH)
            .map(Self)
            .ok_or(DateError::InvalidMonth(value))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds() {
        struct TestCase {
            value: u16,
            valid: bool,
        }

        let cases = [
            TestCase { value: 0, valid: false },
            TestCase { value: 1, valid: true },
            TestCase { value: 2024, valid: true },
            TestCase { value: 9999, valid: true },
            TestCase { value: 10000, valid: false },
            TestCase { value: u16::MAX, valid: false },
        ];

        for case in &cases {
            match Year::new(case.value) {
                Ok(year) => {
                    assert!(case.valid, "year {} should be rejected", case.value);
                    assert_eq!(year.get(), case.value);
                },
                Err(err) => {
                    assert!(!case.valid, "year {} should be accepted", case.value);
                    assert_eq!(err, DateError::InvalidYear(case.value));
                },
            }
        }
    }

    #[test]
    fn test_month_bounds() {
        for m in 1..=12 {
            assert_eq!(Month::new(m).map(Month::get), Ok(m));
        }
        for m in [0, 13, 255] {
            assert_eq!(Month::new(m), Err(DateError::InvalidMonth(m)));
        }
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(Year::new(33).unwrap().to_string(), "0033");
        assert_eq!(Year::new(2024).unwrap().to_string(), "2024");
        assert_eq!(Month::new(8).unwrap().to_string(), "08");
    }
}
