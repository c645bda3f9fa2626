//! Government-declared moratorium periods during which delay penalties do not
//! accrue.

use std::sync::LazyLock;

use tracing::debug;

use crate::date::CalendarDate;
use crate::period::DatePeriod;

/// Built-in moratorium periods as `((y, m, d), (y, m, d))`, first and last day.
const BUILTIN_MORATORIA: [((u16, u8, u8), (u16, u8, u8)); 2] = [
    ((2022, 3, 29), (2023, 6, 30)),
    ((2024, 3, 22), (2025, 12, 31)),
];

static BUILTIN: LazyLock<MoratoriumCalendar> = LazyLock::new(builtin_calendar);

#[allow(clippy::expect_used)]
fn builtin_calendar() -> MoratoriumCalendar {
    builtin_periods()
        .and_then(|periods| MoratoriumCalendar::new(periods).ok())
        .expect("built-in moratorium table is valid")
}

fn builtin_periods() -> Option<Vec<DatePeriod>> {
    BUILTIN_MORATORIA
        .iter()
        .map(|&((sy, sm, sd), (ey, em, ed))| {
            let start = CalendarDate::from_ymd(sy, sm, sd).ok()?;
            let end = CalendarDate::from_ymd(ey, em, ed).ok()?;
            DatePeriod::new(start, end).ok()
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoratoriumError {
    /// Two moratorium periods share at least one day.
    #[error("Moratorium periods {first} and {second} overlap")]
    Overlap { first: DatePeriod, second: DatePeriod },
}

/// Non-overlapping moratorium periods, ordered by start date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoratoriumCalendar {
    periods: Vec<DatePeriod>,
}

impl MoratoriumCalendar {
    /// Sorts the periods and checks that none of them overlap.
    ///
    /// # Errors
    /// Returns `MoratoriumError::Overlap` for the first overlapping pair.
    pub fn new(mut periods: Vec<DatePeriod>) -> Result<Self, MoratoriumError> {
        periods.sort();
        if let Some(pair) = periods.windows(2).find(|pair| pair[0].overlaps(&pair[1])) {
            return Err(MoratoriumError::Overlap {
                first:  pair[0],
                second: pair[1],
            });
        }
        Ok(Self { periods })
    }

    /// A calendar with no moratorium at all.
    pub const fn empty() -> Self {
        Self { periods: Vec::new() }
    }

    /// The moratoria declared for shared-construction agreements:
    /// 29.03.2022–30.06.2023 and 22.03.2024–31.12.2025.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn periods(&self) -> &[DatePeriod] {
        &self.periods
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Days of the delay `[handover, actual]` that fall inside any moratorium.
    pub fn excluded_days(&self, handover: CalendarDate, actual: CalendarDate) -> u64 {
        self.periods
            .iter()
            .map(|period| {
                let days = period.overlap_days(handover, actual);
                if days > 0 {
                    debug!(%period, days, "delay overlaps moratorium");
                }
                days
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn period(s: &str) -> DatePeriod {
        s.parse().unwrap()
    }

    #[test]
    fn test_builtin_periods() {
        let calendar = MoratoriumCalendar::builtin();
        assert_eq!(
            calendar.periods(),
            &[
                period("29.03.2022-30.06.2023"),
                period("22.03.2024-31.12.2025"),
            ]
        );
    }

    #[test]
    fn test_new_sorts_periods() {
        let calendar = MoratoriumCalendar::new(vec![
            period("22.03.2024-31.12.2025"),
            period("29.03.2022-30.06.2023"),
        ])
        .unwrap();
        assert_eq!(calendar.periods()[0], period("29.03.2022-30.06.2023"));
    }

    #[test]
    fn test_new_rejects_overlap() {
        let result = MoratoriumCalendar::new(vec![
            period("01.01.2024-31.03.2024"),
            period("31.03.2024-30.04.2024"),
        ]);
        assert!(matches!(result, Err(MoratoriumError::Overlap { .. })));
    }

    #[test]
    fn test_excluded_days() {
        struct TestCase {
            handover:    &'static str,
            actual:      &'static str,
            expected:    u64,
            description: &'static str,
        }

        let cases = [
            TestCase {
                handover:    "01.01.2023",
                actual:      "01.02.2023",
                expected:    31,
                description: "inside the first moratorium",
            },
            TestCase {
                handover:    "01.06.2023",
                actual:      "10.07.2023",
                expected:    29,
                description: "runs out of the first moratorium",
            },
            TestCase {
                handover:    "01.07.2023",
                actual:      "01.03.2024",
                expected:    0,
                description: "between the moratoria",
            },
            TestCase {
                handover:    "01.01.2022",
                actual:      "01.01.2026",
                expected:    458 + 649,
                description: "spans both moratoria",
            },
            TestCase {
                handover:    "01.02.2023",
                actual:      "01.01.2023",
                expected:    0,
                description: "transfer before handover",
            },
        ];

        let calendar = MoratoriumCalendar::builtin();
        for case in &cases {
            assert_eq!(
                calendar.excluded_days(date(case.handover), date(case.actual)),
                case.expected,
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_empty_calendar_excludes_nothing() {
        let calendar = MoratoriumCalendar::empty();
        assert!(calendar.is_empty());
        assert_eq!(calendar.excluded_days(date("01.01.2023"), date("01.02.2023")), 0);
    }
}
