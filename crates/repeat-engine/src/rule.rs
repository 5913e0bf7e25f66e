//! The repeat-rule data model: pattern, end date, additions and exceptions.
//!
//! A [`RepeatRule`] is produced once by [`RepeatRuleBuilder::build`] and is
//! read-only afterwards. Queries over it live in [`crate::search`].

use std::collections::HashMap;
use std::num::NonZeroU32;

use chrono::NaiveDateTime;

use crate::error::{RepeatError, Result};
use crate::kind::{RepeatKind, WeekdayOrdinal};

/// The repetition pattern, carrying only the parameters its kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    None,
    Daily { frequency: NonZeroU32 },
    Weekly { frequency: NonZeroU32 },
    MonthlyByDate { frequency: NonZeroU32 },
    MonthlyByWeekday {
        frequency: NonZeroU32,
        ordinal: WeekdayOrdinal,
    },
    Yearly { frequency: NonZeroU32 },
    Manual,
}

impl Pattern {
    pub fn kind(&self) -> RepeatKind {
        match self {
            Pattern::None => RepeatKind::None,
            Pattern::Daily { .. } => RepeatKind::Daily,
            Pattern::Weekly { .. } => RepeatKind::Weekly,
            Pattern::MonthlyByDate { .. } => RepeatKind::MonthlyByDate,
            Pattern::MonthlyByWeekday { .. } => RepeatKind::MonthlyByWeekday,
            Pattern::Yearly { .. } => RepeatKind::Yearly,
            Pattern::Manual => RepeatKind::Manual,
        }
    }

    /// Step count between occurrences; `None` for kinds that do not repeat.
    pub fn frequency(&self) -> Option<NonZeroU32> {
        match *self {
            Pattern::Daily { frequency }
            | Pattern::Weekly { frequency }
            | Pattern::MonthlyByDate { frequency }
            | Pattern::MonthlyByWeekday { frequency, .. }
            | Pattern::Yearly { frequency } => Some(frequency),
            Pattern::None | Pattern::Manual => None,
        }
    }

    pub fn ordinal(&self) -> Option<WeekdayOrdinal> {
        match *self {
            Pattern::MonthlyByWeekday { ordinal, .. } => Some(ordinal),
            _ => None,
        }
    }
}

/// An extra date attached to a rule.
///
/// When `repeats` is set the date seeds its own progression under the owning
/// rule's pattern; otherwise it is a single standalone occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditionalOccurrence {
    pub id: i64,
    pub date: NaiveDateTime,
    pub repeats: bool,
}

/// A date excluded from a rule upstream.
///
/// Carried for completeness of the record; occurrence search does not consult
/// exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionDate {
    pub id: i64,
    pub date: NaiveDateTime,
}

/// An assembled, immutable repeat rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatRule {
    pattern: Pattern,
    end_date: Option<NaiveDateTime>,
    additions: HashMap<i64, AdditionalOccurrence>,
    exceptions: HashMap<i64, ExceptionDate>,
}

impl RepeatRule {
    pub fn builder() -> RepeatRuleBuilder {
        RepeatRuleBuilder::default()
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn kind(&self) -> RepeatKind {
        self.pattern.kind()
    }

    pub fn frequency(&self) -> Option<NonZeroU32> {
        self.pattern.frequency()
    }

    pub fn ordinal(&self) -> Option<WeekdayOrdinal> {
        self.pattern.ordinal()
    }

    /// Inclusive upper bound on every occurrence produced by a seed progression.
    pub fn end_date(&self) -> Option<NaiveDateTime> {
        self.end_date
    }

    pub fn additions(&self) -> impl Iterator<Item = &AdditionalOccurrence> {
        self.additions.values()
    }

    pub fn addition(&self, id: i64) -> Option<&AdditionalOccurrence> {
        self.additions.get(&id)
    }

    pub fn exceptions(&self) -> impl Iterator<Item = &ExceptionDate> {
        self.exceptions.values()
    }

    /// Returns the rule with `addition` inserted, replacing any entry with the same id.
    pub fn with_addition(mut self, addition: AdditionalOccurrence) -> Self {
        insert_addition(&mut self.additions, addition);
        self
    }

    pub fn is_no_repeat(&self) -> bool {
        matches!(self.pattern, Pattern::None)
    }

    pub fn is_daily(&self) -> bool {
        matches!(self.pattern, Pattern::Daily { .. })
    }

    pub fn is_weekly(&self) -> bool {
        matches!(self.pattern, Pattern::Weekly { .. })
    }

    pub fn is_monthly_by_date(&self) -> bool {
        matches!(self.pattern, Pattern::MonthlyByDate { .. })
    }

    pub fn is_monthly_by_weekday(&self) -> bool {
        matches!(self.pattern, Pattern::MonthlyByWeekday { .. })
    }

    /// Monthly-by-weekday targeting the given ordinal number (1-5, or 6 for last).
    pub fn is_monthly_by_xth_weekday(&self, number: i64) -> bool {
        self.ordinal().is_some_and(|ordinal| ordinal.number() == number)
    }

    pub fn is_monthly_by_last_weekday(&self) -> bool {
        self.ordinal() == Some(WeekdayOrdinal::Last)
    }

    pub fn is_yearly(&self) -> bool {
        matches!(self.pattern, Pattern::Yearly { .. })
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.pattern, Pattern::Manual)
    }

    pub fn is_repeating(&self) -> bool {
        self.kind().is_repeating()
    }

    /// Upper bound for any occurrence of this rule, or `None` when unbounded.
    ///
    /// Rules without real repetition, and repeating rules without an end date,
    /// are unbounded. Otherwise this is the later of the end date and the latest
    /// addition (repeating or not). The returned instant is a search bound and
    /// need not itself be an occurrence.
    pub fn last_bound_date(&self) -> Option<NaiveDateTime> {
        if !self.is_repeating() {
            return None;
        }
        let end = self.end_date?;
        Some(
            self.additions
                .values()
                .map(|a| a.date)
                .fold(end, NaiveDateTime::max),
        )
    }

    pub fn is_bounded(&self) -> bool {
        self.last_bound_date().is_some()
    }
}

fn insert_addition(
    additions: &mut HashMap<i64, AdditionalOccurrence>,
    addition: AdditionalOccurrence,
) {
    if let Some(previous) = additions.insert(addition.id, addition) {
        tracing::debug!(id = addition.id, ?previous, "replaced additional occurrence");
    }
}

/// Collects rule fields as they arrive and validates them once in [`build`](Self::build).
///
/// Numeric inputs are kept raw until `build`, so an unknown kind code or an
/// out-of-range ordinal is reported there rather than coerced.
#[derive(Debug, Clone, Default)]
pub struct RepeatRuleBuilder {
    kind: Option<i64>,
    frequency: Option<i64>,
    ordinal: Option<i64>,
    end_date: Option<NaiveDateTime>,
    additions: HashMap<i64, AdditionalOccurrence>,
    exceptions: HashMap<i64, ExceptionDate>,
}

impl RepeatRuleBuilder {
    /// Sets the kind from its upstream numeric code.
    pub fn kind_code(mut self, code: i64) -> Self {
        self.kind = Some(code);
        self
    }

    pub fn kind(self, kind: RepeatKind) -> Self {
        self.kind_code(kind.code())
    }

    pub fn frequency(mut self, frequency: i64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Weekday-in-month selector, 1-5 or 6 for last. Ignored by every kind but
    /// monthly-by-weekday.
    pub fn ordinal(mut self, ordinal: i64) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn end_date(mut self, end_date: NaiveDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Adds an extra date; a later call with the same id replaces the earlier one.
    pub fn addition(mut self, id: i64, date: NaiveDateTime, repeats: bool) -> Self {
        insert_addition(&mut self.additions, AdditionalOccurrence { id, date, repeats });
        self
    }

    pub fn exception(mut self, id: i64, date: NaiveDateTime) -> Self {
        self.exceptions.insert(id, ExceptionDate { id, date });
        self
    }

    pub fn build(self) -> Result<RepeatRule> {
        let kind = RepeatKind::try_from(self.kind.ok_or(RepeatError::MissingKind)?)?;

        let pattern = match kind {
            RepeatKind::None => Pattern::None,
            RepeatKind::Manual => Pattern::Manual,
            RepeatKind::Daily => Pattern::Daily {
                frequency: self.checked_frequency()?,
            },
            RepeatKind::Weekly => Pattern::Weekly {
                frequency: self.checked_frequency()?,
            },
            RepeatKind::MonthlyByDate => Pattern::MonthlyByDate {
                frequency: self.checked_frequency()?,
            },
            RepeatKind::MonthlyByWeekday => Pattern::MonthlyByWeekday {
                frequency: self.checked_frequency()?,
                ordinal: WeekdayOrdinal::try_from(
                    self.ordinal.ok_or(RepeatError::MissingOrdinal)?,
                )?,
            },
            RepeatKind::Yearly => Pattern::Yearly {
                frequency: self.checked_frequency()?,
            },
        };

        Ok(RepeatRule {
            pattern,
            end_date: self.end_date,
            additions: self.additions,
            exceptions: self.exceptions,
        })
    }

    fn checked_frequency(&self) -> Result<NonZeroU32> {
        let raw = self.frequency.ok_or(RepeatError::MissingFrequency)?;
        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(RepeatError::InvalidFrequency(raw))
    }
}
