//! Error types for repeat-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepeatError {
    #[error("Unknown repeat kind code: {0}")]
    UnknownKind(i64),

    #[error("Repeat kind was never set")]
    MissingKind,

    #[error("Invalid weekday ordinal: {0} (expected 1-6)")]
    InvalidOrdinal(i64),

    #[error("Monthly-by-weekday rule requires an ordinal")]
    MissingOrdinal,

    #[error("Invalid repeat frequency: {0} (expected a positive step count)")]
    InvalidFrequency(i64),

    #[error("Repeating rule requires a frequency")]
    MissingFrequency,

    /// `last_occurrence` was asked for on a rule without a last bound date.
    #[error("Rule is unbounded: no end date to walk towards")]
    UnboundedRule,

    /// Yearly stepping landed on a year where the seed's month/day does not exist.
    #[error("Date {year:04}-{month:02}-{day:02} does not exist")]
    NonexistentDate { year: i32, month: u32, day: u32 },
}

pub type Result<T> = std::result::Result<T, RepeatError>;
