//! Occurrence expansion -- turns a rule and its seed into concrete start/end spans.
//!
//! The span length is taken from the owning entry (its end minus its start) and
//! applied to every occurrence, the same way a repeating calendar entry keeps
//! its duration on every repetition.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::Result;
use crate::rule::RepeatRule;
use crate::search::occurrences_between;

/// A single expanded occurrence with start and end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedOccurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Expand every occurrence starting inside `[window_start, window_end]`.
///
/// # Arguments
/// - `rule` -- The assembled repeat rule
/// - `primary_seed` -- Start of the owning entry
/// - `duration_minutes` -- Length of each occurrence in minutes
/// - `window_start` / `window_end` -- Inclusive bounds on occurrence starts
///
/// # Errors
/// Propagates [`crate::RepeatError::NonexistentDate`] from yearly stepping.
pub fn expand_occurrences(
    rule: &RepeatRule,
    primary_seed: NaiveDateTime,
    duration_minutes: u32,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Result<Vec<ExpandedOccurrence>> {
    if window_start > window_end {
        return Ok(Vec::new());
    }

    let duration = TimeDelta::minutes(i64::from(duration_minutes));

    Ok(
        occurrences_between(rule, primary_seed, window_start, window_end)?
            .into_iter()
            .map(|start| ExpandedOccurrence {
                start,
                // Saturate at the end of the calendar rather than drop the occurrence.
                end: start
                    .checked_add_signed(duration)
                    .unwrap_or(NaiveDateTime::MAX),
            })
            .collect(),
    )
}
