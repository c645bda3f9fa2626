//! Statutory penalty for late handover of residential property.
//!
//! Given the contractual handover date, the actual transfer date, the price
//! and the payer category, the crate counts the overdue days (optionally
//! leaving out government moratorium periods), looks up the central-bank key
//! rate in force on the handover date and computes
//!
//! ```text
//! penalty = price * 2 * rate / 100 * days / 300   (individuals)
//! penalty = price * 2 * rate / 100 * days / 150   (legal entities)
//! ```
//!
//! rounded half-up to two fraction digits.
//!
//! ```
//! use delay_penalty::{PayerCategory, PenaltyRequest, compute_penalty};
//!
//! let result = compute_penalty(&PenaltyRequest {
//!     price: "5 000 000".into(),
//!     handover_date: "01.01.2023".into(),
//!     actual_date: "01.02.2023".into(),
//!     payer: PayerCategory::Individual,
//!     exclude_moratorium: false,
//! })
//! .unwrap();
//!
//! assert_eq!(result.overdue_days, 31);
//! assert_eq!(result.penalty_amount.unwrap().to_string(), "77500.00");
//! ```

mod consts;
mod prelude;

pub mod date;
pub mod engine;
pub mod moratorium;
pub mod period;
pub mod price;
pub mod reference;
pub mod schedule;
pub mod types;

pub use consts::*;
pub use date::{CalendarDate, DateError, days_between, max_clamped_non_negative};
pub use engine::{
    Field, PayerCategory, PenaltyEngine, PenaltyError, PenaltyRequest, PenaltyResult, PenaltyTerms,
    penalty_amount,
};
pub use moratorium::{MoratoriumCalendar, MoratoriumError};
pub use period::{DatePeriod, PeriodError};
pub use price::{Price, PriceError};
pub use reference::{KeyRateStep, ReferenceData, ReferenceError};
pub use rust_decimal::Decimal;
pub use schedule::{RateInterval, RateSchedule, RateSource, ScheduleError};

/// Computes the penalty with the built-in key rate and moratorium tables.
///
/// # Errors
/// `InvalidPrice`, `InvalidDateFormat` or `InvalidCalendarDate` when one of
/// the text fields does not validate.
pub fn compute_penalty(request: &PenaltyRequest) -> Result<PenaltyResult, PenaltyError> {
    PenaltyEngine::builtin().compute(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_date() -> impl Strategy<Value = CalendarDate> {
        (2018u16..=2027, 1u8..=12, 1u8..=28)
            .prop_map(|(y, m, d)| CalendarDate::from_ymd(y, m, d).unwrap())
    }

    fn arb_payer() -> impl Strategy<Value = PayerCategory> {
        prop_oneof![Just(PayerCategory::Individual), Just(PayerCategory::LegalEntity)]
    }

    fn request(
        price: u32,
        handover: CalendarDate,
        actual: CalendarDate,
        payer: PayerCategory,
        exclude_moratorium: bool,
    ) -> PenaltyRequest {
        PenaltyRequest {
            price: price.to_string(),
            handover_date: handover.to_string(),
            actual_date: actual.to_string(),
            payer,
            exclude_moratorium,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_early_transfer_owes_nothing(
            price in 1u32..100_000_000,
            handover in arb_date(),
            back in 1i64..2000,
            payer in arb_payer(),
            exclude in any::<bool>(),
        ) {
            let Some(actual) = (0..back).try_fold(handover, |d, _| d.previous_day()) else {
                return Ok(());
            };
            let result = compute_penalty(&request(price, handover, actual, payer, exclude)).unwrap();
            prop_assert_eq!(result.overdue_days, 0);
            prop_assert_eq!(result.penalty_amount, None);
        }

        #[test]
        fn prop_without_exclusion_days_are_calendar_days(
            price in 1u32..100_000_000,
            handover in arb_date(),
            actual in arb_date(),
            payer in arb_payer(),
        ) {
            let result = compute_penalty(&request(price, handover, actual, payer, false)).unwrap();
            prop_assert_eq!(result.overdue_days, max_clamped_non_negative(days_between(handover, actual)));
            prop_assert_eq!(result.excluded_days, 0);
        }

        #[test]
        fn prop_computation_is_idempotent(
            price in 1u32..100_000_000,
            handover in arb_date(),
            actual in arb_date(),
            payer in arb_payer(),
            exclude in any::<bool>(),
        ) {
            let req = request(price, handover, actual, payer, exclude);
            prop_assert_eq!(compute_penalty(&req), compute_penalty(&req));
        }

        #[test]
        fn prop_exclusion_never_adds_days(
            price in 1u32..100_000_000,
            handover in arb_date(),
            actual in arb_date(),
            payer in arb_payer(),
        ) {
            let with = compute_penalty(&request(price, handover, actual, payer, true)).unwrap();
            let without = compute_penalty(&request(price, handover, actual, payer, false)).unwrap();
            prop_assert!(with.overdue_days <= without.overdue_days);
        }

        #[test]
        fn prop_rate_depends_only_on_handover(
            price in 1u32..100_000_000,
            handover in arb_date(),
            first in arb_date(),
            second in arb_date(),
            payer in arb_payer(),
            exclude in any::<bool>(),
        ) {
            let a = compute_penalty(&request(price, handover, first, payer, exclude)).unwrap();
            let b = compute_penalty(&request(price, handover, second, payer, exclude)).unwrap();
            prop_assert_eq!(a.applied_rate_percent, b.applied_rate_percent);
            prop_assert_eq!(a.applied_rate_percent, RateSchedule::builtin().rate_in_effect_on(handover));
        }

        #[test]
        fn prop_legal_entity_owes_about_double(
            price in 1u32..100_000_000,
            handover in arb_date(),
            actual in arb_date(),
        ) {
            let individual = compute_penalty(&request(price, handover, actual, PayerCategory::Individual, false)).unwrap();
            let legal = compute_penalty(&request(price, handover, actual, PayerCategory::LegalEntity, false)).unwrap();
            match (individual.penalty_amount, legal.penalty_amount) {
                (Some(i), Some(l)) => prop_assert!((l - i * Decimal::TWO).abs() <= Decimal::new(1, 2)),
                (None, None) => {},
                other => prop_assert!(false, "applicability differs: {:?}", other),
            }
        }
    }
}
