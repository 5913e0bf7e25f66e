//! Occurrence search across the primary seed and all additions.
//!
//! The primary seed and every repeating addition each seed a progression under
//! the rule's pattern; candidates from those progressions are capped by the
//! rule's end date. Non-repeating additions are standalone occurrences and are
//! not capped. The next occurrence is the minimum over everything that survives.

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{RepeatError, Result};
use crate::rule::RepeatRule;
use crate::stepper;

/// Progress step used when walking from one occurrence to the next.
fn step() -> TimeDelta {
    TimeDelta::seconds(1)
}

/// Earliest occurrence of `rule` at or after `after`.
///
/// `Ok(None)` means no occurrence qualifies; that is not an error.
///
/// # Errors
/// Returns [`RepeatError::NonexistentDate`] when a yearly progression lands on
/// a date missing from its target year and that date would be the answer: it
/// is within the end date and no other candidate comes before it.
pub fn next_occurrence_after(
    rule: &RepeatRule,
    primary_seed: NaiveDateTime,
    after: NaiveDateTime,
) -> Result<Option<NaiveDateTime>> {
    let pattern = rule.pattern();
    let end_date = rule.end_date();

    let seeds = std::iter::once(primary_seed).chain(
        rule.additions()
            .filter(|addition| addition.repeats)
            .map(|addition| addition.date),
    );

    let mut next: Option<NaiveDateTime> = None;
    let mut missing: Option<(CalendarKey, RepeatError)> = None;
    for seed in seeds {
        let candidate = match stepper::step(pattern, seed, after) {
            Ok(Some(candidate)) => candidate,
            Ok(None) => continue,
            Err(RepeatError::NonexistentDate { year, month, day }) => {
                let key = (year, month, day, seed.time());
                if end_date.is_some_and(|end| key > calendar_key(end)) {
                    tracing::trace!(%seed, year, month, day, "nonexistent date past end date");
                    continue;
                }
                if missing.as_ref().is_none_or(|(earliest, _)| key < *earliest) {
                    missing = Some((key, RepeatError::NonexistentDate { year, month, day }));
                }
                continue;
            }
            Err(e) => return Err(e),
        };
        if end_date.is_some_and(|end| candidate > end) {
            continue;
        }
        tracing::trace!(%seed, %candidate, "progression candidate");
        next = Some(next.map_or(candidate, |best| best.min(candidate)));
    }

    let one_off = rule
        .additions()
        .filter(|addition| !addition.repeats && addition.date >= after)
        .map(|addition| addition.date)
        .min();

    let next = match (next, one_off) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    match missing {
        Some((key, err)) if next.is_none_or(|found| key < calendar_key(found)) => Err(err),
        _ => Ok(next),
    }
}

/// Orders real instants against dates that do not exist (Feb 29 of a common year).
type CalendarKey = (i32, u32, u32, NaiveTime);

fn calendar_key(instant: NaiveDateTime) -> CalendarKey {
    (instant.year(), instant.month(), instant.day(), instant.time())
}

/// The final occurrence of a bounded rule.
///
/// Walks every occurrence after `primary_seed` until none is left; if there are
/// none, the seed itself is returned.
///
/// # Errors
/// Returns [`RepeatError::UnboundedRule`] if [`RepeatRule::last_bound_date`] is
/// `None`, since the walk would never end.
#[tracing::instrument(level = "debug", skip(rule), fields(kind = %rule.kind()))]
pub fn last_occurrence(rule: &RepeatRule, primary_seed: NaiveDateTime) -> Result<NaiveDateTime> {
    if !rule.is_bounded() {
        return Err(RepeatError::UnboundedRule);
    }

    let Some(start) = primary_seed.checked_add_signed(step()) else {
        return Ok(primary_seed);
    };

    let mut last = primary_seed;
    for occurrence in occurrences(rule, primary_seed, start) {
        last = occurrence?;
    }
    Ok(last)
}

/// Iterate occurrences of `rule` in ascending order, starting at `after`.
///
/// The iterator ends when no further occurrence exists, and also after
/// yielding an error. On an unbounded repeating rule it never ends by itself.
pub fn occurrences(
    rule: &RepeatRule,
    primary_seed: NaiveDateTime,
    after: NaiveDateTime,
) -> Occurrences<'_> {
    Occurrences {
        rule,
        primary_seed,
        cursor: Some(after),
    }
}

/// Occurrences within `[from, until]`, in ascending order.
pub fn occurrences_between(
    rule: &RepeatRule,
    primary_seed: NaiveDateTime,
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>> {
    occurrences(rule, primary_seed, from)
        .take_while(|occurrence| match occurrence {
            Ok(instant) => *instant <= until,
            Err(_) => true,
        })
        .collect()
}

/// Iterator returned by [`occurrences`].
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RepeatRule,
    primary_seed: NaiveDateTime,
    cursor: Option<NaiveDateTime>,
}

impl Iterator for Occurrences<'_> {
    type Item = Result<NaiveDateTime>;

    fn next(&mut self) -> Option<Self::Item> {
        let after = self.cursor.take()?;
        match next_occurrence_after(self.rule, self.primary_seed, after) {
            Ok(Some(occurrence)) => {
                self.cursor = occurrence.checked_add_signed(step());
                Some(Ok(occurrence))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl FusedIterator for Occurrences<'_> {}
