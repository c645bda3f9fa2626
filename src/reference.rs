//! Reference tables as configuration.
//!
//! The key rate history and the moratorium periods ship with the crate, but
//! both are revised from time to time. `ReferenceData` is their serializable
//! form so a caller can supply updated tables without touching the engine:
//!
//! ```json
//! {
//!   "key_rates": [{ "since": "17.06.2019", "rate": "7.50" }],
//!   "moratoria": [{ "start": "29.03.2022", "end": "30.06.2023" }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::moratorium::{MoratoriumCalendar, MoratoriumError};
use crate::period::DatePeriod;
use crate::prelude::*;
use crate::schedule::{self, RateSchedule, ScheduleError};

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Malformed reference data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Moratorium(#[from] MoratoriumError),
}

/// A key rate decision: the rate applies from `since` until the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRateStep {
    pub since: CalendarDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate:  Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub key_rates: Vec<KeyRateStep>,
    #[serde(default)]
    pub moratoria: Vec<DatePeriod>,
}

impl ReferenceData {
    /// The tables embedded in the crate.
    pub fn builtin() -> Self {
        let key_rates = schedule::builtin_steps()
            .unwrap_or_default()
            .into_iter()
            .map(|(since, rate)| KeyRateStep { since, rate })
            .collect();
        let moratoria = MoratoriumCalendar::builtin().periods().to_vec();
        Self {
            key_rates,
            moratoria,
        }
    }

    /// # Errors
    /// `ReferenceError::Json` when the text is not valid JSON for this shape,
    /// including dates that are not `DD.MM.YYYY` and inverted periods.
    pub fn from_json(text: &str) -> Result<Self, ReferenceError> {
        Ok(serde_json::from_str(text)?)
    }

    /// # Errors
    /// `ReferenceError::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ReferenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the validated tables.
    ///
    /// # Errors
    /// `Schedule` for duplicate or negative key rate steps, `Moratorium` for
    /// overlapping moratorium periods.
    pub fn into_parts(self) -> Result<(RateSchedule, MoratoriumCalendar), ReferenceError> {
        let steps: Vec<(CalendarDate, Decimal)> = self
            .key_rates
            .iter()
            .map(|step| (step.since, step.rate))
            .collect();
        let rates = RateSchedule::from_steps(&steps)?;
        let moratoria = MoratoriumCalendar::new(self.moratoria)?;
        Ok((rates, moratoria))
    }
}
