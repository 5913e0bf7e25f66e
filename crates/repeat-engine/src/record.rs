//! Upstream record carrier for repeat rules.
//!
//! The data-mapping layer hands over the repeat fields of a calendar entry or
//! booking with instants already typed. [`RepeatRecord`] mirrors those fields
//! one-to-one and converts into a validated [`RepeatRule`].

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{RepeatError, Result};
use crate::rule::RepeatRule;

/// Repeat fields of an upstream record.
///
/// Missing fields take their upstream defaults: kind code `0` (no repetition),
/// no frequency, no ordinal, no end date, no additions or exceptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepeatRecord {
    #[serde(default)]
    pub repeat_id: i64,
    pub repeat_frequence: Option<i64>,
    pub repeat_option_id: Option<i64>,
    pub repeat_until: Option<NaiveDateTime>,
    #[serde(default)]
    pub additions: Vec<AdditionRecord>,
    #[serde(default)]
    pub exceptions: Vec<ExceptionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdditionRecord {
    pub id: i64,
    pub add_date: NaiveDateTime,
    #[serde(default)]
    pub repeats: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExceptionRecord {
    pub id: i64,
    pub except_date_start: NaiveDateTime,
}

impl TryFrom<RepeatRecord> for RepeatRule {
    type Error = RepeatError;

    fn try_from(record: RepeatRecord) -> Result<Self> {
        let mut builder = RepeatRule::builder().kind_code(record.repeat_id);

        if let Some(frequency) = record.repeat_frequence {
            builder = builder.frequency(frequency);
        }
        if let Some(ordinal) = record.repeat_option_id {
            builder = builder.ordinal(ordinal);
        }
        if let Some(until) = record.repeat_until {
            builder = builder.end_date(until);
        }
        for addition in record.additions {
            builder = builder.addition(addition.id, addition.add_date, addition.repeats);
        }
        for exception in record.exceptions {
            builder = builder.exception(exception.id, exception.except_date_start);
        }

        builder.build()
    }
}
