//! Repeat kinds and weekday ordinals, with their upstream numeric codes.
//!
//! The upstream record carries the repeat kind as a bare integer (`repeat_id`)
//! and the weekday-in-month selector as another integer (`repeat_option_id`).
//! Both map onto closed enumerations here; any other value is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RepeatError, Result};

/// The closed set of repetition categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RepeatKind {
    /// A single occurrence, no repetition (code 0).
    None,
    /// Every `frequency` days (code 1).
    Daily,
    /// Every `frequency` weeks (code 7).
    Weekly,
    /// Same day of month, every `frequency` months (code 31).
    MonthlyByDate,
    /// Nth (or last) weekday of month, every `frequency` months (code 32).
    MonthlyByWeekday,
    /// Same month and day, every `frequency` years (code 365).
    Yearly,
    /// Dates are maintained by hand through additions (code 999).
    Manual,
}

impl RepeatKind {
    /// The numeric code used by the upstream record.
    pub fn code(self) -> i64 {
        match self {
            RepeatKind::None => 0,
            RepeatKind::Daily => 1,
            RepeatKind::Weekly => 7,
            RepeatKind::MonthlyByDate => 31,
            RepeatKind::MonthlyByWeekday => 32,
            RepeatKind::Yearly => 365,
            RepeatKind::Manual => 999,
        }
    }

    /// Whether this kind produces a progression from each seed.
    pub fn is_repeating(self) -> bool {
        !matches!(self, RepeatKind::None | RepeatKind::Manual)
    }
}

impl TryFrom<i64> for RepeatKind {
    type Error = RepeatError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(RepeatKind::None),
            1 => Ok(RepeatKind::Daily),
            7 => Ok(RepeatKind::Weekly),
            31 => Ok(RepeatKind::MonthlyByDate),
            32 => Ok(RepeatKind::MonthlyByWeekday),
            365 => Ok(RepeatKind::Yearly),
            999 => Ok(RepeatKind::Manual),
            other => Err(RepeatError::UnknownKind(other)),
        }
    }
}

impl From<RepeatKind> for i64 {
    fn from(kind: RepeatKind) -> i64 {
        kind.code()
    }
}

impl fmt::Display for RepeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepeatKind::None => "none",
            RepeatKind::Daily => "daily",
            RepeatKind::Weekly => "weekly",
            RepeatKind::MonthlyByDate => "monthly-by-date",
            RepeatKind::MonthlyByWeekday => "monthly-by-weekday",
            RepeatKind::Yearly => "yearly",
            RepeatKind::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Which weekday of the month a monthly-by-weekday rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum WeekdayOrdinal {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    /// The last occurrence of the weekday in the month (code 6).
    Last,
}

impl WeekdayOrdinal {
    /// The numeric option code, 1-6.
    pub fn number(self) -> i64 {
        match self {
            WeekdayOrdinal::First => 1,
            WeekdayOrdinal::Second => 2,
            WeekdayOrdinal::Third => 3,
            WeekdayOrdinal::Fourth => 4,
            WeekdayOrdinal::Fifth => 5,
            WeekdayOrdinal::Last => 6,
        }
    }
}

impl TryFrom<i64> for WeekdayOrdinal {
    type Error = RepeatError;

    fn try_from(number: i64) -> Result<Self> {
        match number {
            1 => Ok(WeekdayOrdinal::First),
            2 => Ok(WeekdayOrdinal::Second),
            3 => Ok(WeekdayOrdinal::Third),
            4 => Ok(WeekdayOrdinal::Fourth),
            5 => Ok(WeekdayOrdinal::Fifth),
            6 => Ok(WeekdayOrdinal::Last),
            other => Err(RepeatError::InvalidOrdinal(other)),
        }
    }
}

impl From<WeekdayOrdinal> for i64 {
    fn from(ordinal: WeekdayOrdinal) -> i64 {
        ordinal.number()
    }
}

