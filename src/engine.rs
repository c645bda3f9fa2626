//! Penalty computation.
//!
//! The engine is a pure function of its request: validate the text fields,
//! count the overdue days, take out moratorium days if asked, look up the key
//! rate in force on the handover date and apply the statutory formula.

use std::borrow::Cow;
use std::fmt;

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    INDIVIDUAL_DAILY_DIVISOR, LEGAL_ENTITY_DAILY_DIVISOR, MONEY_SCALE, PENALTY_FACTOR, PERCENT,
};
use crate::date::{CalendarDate, DateError, days_between, max_clamped_non_negative};
use crate::moratorium::MoratoriumCalendar;
use crate::prelude::*;
use crate::price::{Price, PriceError};
use crate::reference::ReferenceData;
use crate::schedule::{RateSchedule, RateSource};

/// Who is owed the penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayerCategory {
    #[default]
    Individual,
    LegalEntity,
}

impl PayerCategory {
    /// Denominator of the daily share of the key rate: 300 for individuals,
    /// 150 for legal entities.
    pub const fn daily_divisor(self) -> u32 {
        match self {
            Self::Individual => INDIVIDUAL_DAILY_DIVISOR,
            Self::LegalEntity => LEGAL_ENTITY_DAILY_DIVISOR,
        }
    }
}

/// Input field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    #[display(fmt = "price")]
    Price,
    #[display(fmt = "handover date")]
    HandoverDate,
    #[display(fmt = "actual date")]
    ActualDate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PenaltyError {
    /// The text does not match `DD.MM.YYYY`.
    #[error("{field}: {source}")]
    InvalidDateFormat { field: Field, source: DateError },

    /// The text matches `DD.MM.YYYY` but names a day that does not exist.
    #[error("{field}: {source}")]
    InvalidCalendarDate { field: Field, source: DateError },

    #[error("{}: {source}", Field::Price)]
    InvalidPrice { source: PriceError },
}

impl PenaltyError {
    fn date(field: Field, source: DateError) -> Self {
        if source.is_format_error() {
            Self::InvalidDateFormat { field, source }
        } else {
            Self::InvalidCalendarDate { field, source }
        }
    }

    /// The input field that failed validation.
    pub const fn field(&self) -> Field {
        match self {
            Self::InvalidDateFormat { field, .. } | Self::InvalidCalendarDate { field, .. } => *field,
            Self::InvalidPrice { .. } => Field::Price,
        }
    }
}

impl From<PriceError> for PenaltyError {
    fn from(source: PriceError) -> Self {
        Self::InvalidPrice { source }
    }
}

/// A request as captured from the user: raw text for the price and dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyRequest {
    pub price:              String,
    pub handover_date:      String,
    pub actual_date:        String,
    #[serde(default)]
    pub payer:              PayerCategory,
    #[serde(default)]
    pub exclude_moratorium: bool,
}

impl PenaltyRequest {
    /// Checks the fields in order (price, handover date, actual date) and
    /// stops at the first invalid one.
    ///
    /// # Errors
    /// `InvalidPrice`, `InvalidDateFormat` or `InvalidCalendarDate`, tagged
    /// with the offending field.
    pub fn validate(&self) -> Result<PenaltyTerms, PenaltyError> {
        let price = Price::parse(&self.price)?;
        let handover_date = parse_field(&self.handover_date, Field::HandoverDate)?;
        let actual_date = parse_field(&self.actual_date, Field::ActualDate)?;
        Ok(PenaltyTerms {
            price,
            handover_date,
            actual_date,
            payer: self.payer,
            exclude_moratorium: self.exclude_moratorium,
        })
    }
}

fn parse_field(text: &str, field: Field) -> Result<CalendarDate, PenaltyError> {
    CalendarDate::parse_strict(text).map_err(|source| PenaltyError::date(field, source))
}

/// A validated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyTerms {
    pub price:              Price,
    pub handover_date:      CalendarDate,
    pub actual_date:        CalendarDate,
    pub payer:              PayerCategory,
    pub exclude_moratorium: bool,
}

/// Outcome of a computation.
///
/// `penalty_amount` is `None` when no penalty accrues (no overdue days left,
/// or no key rate known for the handover date); callers should then show no
/// amount at all rather than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyResult {
    /// Overdue days after moratorium exclusion.
    pub overdue_days:         u64,
    /// Penalty rounded half-up to kopecks.
    #[serde(with = "rust_decimal::serde::str_option")]
    pub penalty_amount:       Option<Decimal>,
    /// Key rate in force on the handover date.
    #[serde(with = "rust_decimal::serde::str_option")]
    pub applied_rate_percent: Option<Decimal>,
    /// Calendar days from handover to actual transfer, clamped at zero.
    pub raw_days:             u64,
    /// Days removed by moratorium exclusion.
    pub excluded_days:        u64,
}

impl PenaltyResult {
    pub const fn is_applicable(&self) -> bool {
        self.penalty_amount.is_some()
    }
}

impl fmt::Display for PenaltyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} overdue days", self.overdue_days)?;
        match (self.penalty_amount, self.applied_rate_percent) {
            (Some(amount), Some(rate)) => write!(f, ", penalty {amount} at {rate}%"),
            (None, Some(rate)) => write!(f, ", no penalty at {rate}%"),
            (_, None) => write!(f, ", no key rate for the handover date"),
        }
    }
}

/// `price * 2 * rate / 100 * days / divisor`, multiplied out before the single
/// division so the result is exact before rounding.
///
/// A numerator too large for `Decimal` is divided first instead. `None` only
/// when the amount itself is out of range, which a `Price` below `MAX_PRICE`
/// and a rate up to `MAX_RATE_PERCENT` cannot reach over any date span.
pub fn penalty_amount(
    price: Price,
    rate_percent: Decimal,
    days: u64,
    payer: PayerCategory,
) -> Option<Decimal> {
    let price = price.amount();
    let days = Decimal::from(days);
    let factor = Decimal::from(PENALTY_FACTOR);
    let denominator = Decimal::from(PERCENT) * Decimal::from(payer.daily_divisor());

    let exact = price
        .checked_mul(rate_percent)
        .and_then(|n| n.checked_mul(days))
        .and_then(|n| n.checked_mul(factor))
        .and_then(|n| n.checked_div(denominator));
    let amount = exact.or_else(|| {
        price
            .checked_div(denominator)?
            .checked_mul(rate_percent)?
            .checked_mul(days)?
            .checked_mul(factor)
    })?;

    let mut amount = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(MONEY_SCALE);
    Some(amount)
}

/// Computes penalties against a rate source and a set of moratorium periods.
#[derive(Debug, Clone)]
pub struct PenaltyEngine<R = RateSchedule> {
    rates:     R,
    moratoria: Cow<'static, MoratoriumCalendar>,
}

impl PenaltyEngine<&'static RateSchedule> {
    /// Engine over the embedded key rate history and moratorium table.
    /// Borrows both statics, nothing is copied.
    pub fn builtin() -> Self {
        Self {
            rates:     RateSchedule::builtin(),
            moratoria: Cow::Borrowed(MoratoriumCalendar::builtin()),
        }
    }
}

impl PenaltyEngine<RateSchedule> {
    /// Engine over tables loaded from configuration.
    pub fn from_reference(data: ReferenceData) -> Result<Self, crate::reference::ReferenceError> {
        let (rates, moratoria) = data.into_parts()?;
        Ok(Self::new(rates, moratoria))
    }
}

impl<R: RateSource> PenaltyEngine<R> {
    /// Engine over any rate source and an owned moratorium calendar.
    pub const fn new(rates: R, moratoria: MoratoriumCalendar) -> Self {
        Self {
            rates,
            moratoria: Cow::Owned(moratoria),
        }
    }

    /// The rate source used to resolve the key rate.
    pub const fn rates(&self) -> &R {
        &self.rates
    }

    /// The periods left out when `exclude_moratorium` is set.
    pub fn moratoria(&self) -> &MoratoriumCalendar {
        &self.moratoria
    }

    /// Validates the request, then evaluates it.
    ///
    /// # Errors
    /// The first validation failure; nothing after validation can fail.
    pub fn compute(&self, request: &PenaltyRequest) -> Result<PenaltyResult, PenaltyError> {
        let terms = request.validate().inspect_err(|err| {
            debug!(field = %err.field(), error = %err, "penalty request rejected");
        })?;
        Ok(self.evaluate(&terms))
    }

    /// Runs the computation on already validated terms.
    pub fn evaluate(&self, terms: &PenaltyTerms) -> PenaltyResult {
        let handover = terms.handover_date;
        let actual = terms.actual_date;

        let raw_days = max_clamped_non_negative(days_between(handover, actual));
        let excluded_days = if terms.exclude_moratorium {
            self.moratoria.excluded_days(handover, actual)
        } else {
            0
        };
        let overdue_days = raw_days.saturating_sub(excluded_days);

        let applied_rate_percent = self.rates.rate_in_effect_on(handover);

        let penalty_amount = match applied_rate_percent {
            Some(rate) if overdue_days > 0 => penalty_amount(terms.price, rate, overdue_days, terms.payer),
            _ => None,
        };

        debug!(
            %handover,
            %actual,
            raw_days,
            excluded_days,
            overdue_days,
            rate = ?applied_rate_percent,
            penalty = ?penalty_amount,
            "penalty evaluated"
        );

        PenaltyResult {
            overdue_days,
            penalty_amount,
            applied_rate_percent,
            raw_days,
            excluded_days,
        }
    }

    /// Key rate for a handover date still being typed, using the same rule as
    /// [`Self::evaluate`].
    ///
    /// # Errors
    /// `InvalidDateFormat` or `InvalidCalendarDate` for the handover date.
    pub fn rate_preview(&self, handover_date: &str) -> Result<Option<Decimal>, PenaltyError> {
        let handover = parse_field(handover_date, Field::HandoverDate)?;
        Ok(self.rates.rate_in_effect_on(handover))
    }
}
