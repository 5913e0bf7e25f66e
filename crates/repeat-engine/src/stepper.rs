//! Per-pattern steppers.
//!
//! Each stepper takes a seed and a lower bound and returns the earliest member
//! of the seed's progression that is not before the lower bound. `None` means
//! no such instant is representable. Steppers know nothing about end dates;
//! the search applies those.
//!
//! Fixed-length steps (days, weeks) are solved in closed form. Calendar steps
//! (months, years) jump straight to the first period that can reach the lower
//! bound and then walk forward one period at a time, which yields the same
//! result as walking from the seed.

use std::num::NonZeroU32;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};

use crate::error::{RepeatError, Result};
use crate::kind::WeekdayOrdinal;
use crate::rule::Pattern;

const SECONDS_PER_DAY: i64 = 86_400;

/// Run the stepper selected by `pattern`.
///
/// Only [`yearly`] can fail; see [`RepeatError::NonexistentDate`].
pub fn step(
    pattern: Pattern,
    seed: NaiveDateTime,
    lower: NaiveDateTime,
) -> Result<Option<NaiveDateTime>> {
    match pattern {
        Pattern::None | Pattern::Manual => Ok(single(seed, lower)),
        Pattern::Daily { frequency } => Ok(daily(seed, lower, frequency)),
        Pattern::Weekly { frequency } => Ok(weekly(seed, lower, frequency)),
        Pattern::MonthlyByDate { frequency } => Ok(monthly_by_date(seed, lower, frequency)),
        Pattern::MonthlyByWeekday { frequency, ordinal } => {
            Ok(monthly_by_weekday(seed, lower, frequency, ordinal))
        }
        Pattern::Yearly { frequency } => yearly(seed, lower, frequency),
    }
}

/// The seed itself, if it is not before `lower`.
pub fn single(seed: NaiveDateTime, lower: NaiveDateTime) -> Option<NaiveDateTime> {
    (seed >= lower).then_some(seed)
}

/// `seed + k * frequency` days.
pub fn daily(
    seed: NaiveDateTime,
    lower: NaiveDateTime,
    frequency: NonZeroU32,
) -> Option<NaiveDateTime> {
    fixed_step(seed, lower, i64::from(frequency.get()) * SECONDS_PER_DAY)
}

/// `seed + k * frequency` weeks.
pub fn weekly(
    seed: NaiveDateTime,
    lower: NaiveDateTime,
    frequency: NonZeroU32,
) -> Option<NaiveDateTime> {
    fixed_step(seed, lower, i64::from(frequency.get()) * 7 * SECONDS_PER_DAY)
}

fn fixed_step(seed: NaiveDateTime, lower: NaiveDateTime, step_secs: i64) -> Option<NaiveDateTime> {
    if seed >= lower {
        return Some(seed);
    }

    let gap = lower - seed;
    let gap_secs = gap.num_seconds();
    let mut periods = gap_secs / step_secs;
    // Round up: any remainder, including sub-second, needs one more period.
    if gap_secs % step_secs != 0 || gap.subsec_nanos() != 0 {
        periods += 1;
    }

    let offset = TimeDelta::try_seconds(periods.checked_mul(step_secs)?)?;
    seed.checked_add_signed(offset)
}

/// Same day of month as the seed, every `frequency` months.
///
/// Months that lack the seed's day (day 31 in April, day 30 in February) are
/// skipped without emitting anything.
pub fn monthly_by_date(
    seed: NaiveDateTime,
    lower: NaiveDateTime,
    frequency: NonZeroU32,
) -> Option<NaiveDateTime> {
    let day = seed.day();
    walk_months(seed, lower, frequency, |year, month| {
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// The `ordinal`-th (or last) occurrence of the seed's weekday, every
/// `frequency` months.
///
/// A month without the requested weekday (a fifth Friday in a four-Friday
/// month) yields nothing, and the walk moves on by `frequency` months as usual.
pub fn monthly_by_weekday(
    seed: NaiveDateTime,
    lower: NaiveDateTime,
    frequency: NonZeroU32,
    ordinal: WeekdayOrdinal,
) -> Option<NaiveDateTime> {
    let weekday = seed.weekday();
    walk_months(seed, lower, frequency, |year, month| {
        weekday_in_month(year, month, weekday, ordinal)
    })
}

/// Visit `seed`'s month and every `frequency`-th month after it, returning the
/// first date produced by `pick` whose instant is not before `lower` or `seed`.
fn walk_months<F>(
    seed: NaiveDateTime,
    lower: NaiveDateTime,
    frequency: NonZeroU32,
    pick: F,
) -> Option<NaiveDateTime>
where
    F: Fn(i32, u32) -> Option<NaiveDate>,
{
    let floor = lower.max(seed);
    let time = seed.time();
    let freq = i64::from(frequency.get());
    let seed_index = month_index(seed.date());
    let lower_index = month_index(floor.date());

    // Every period before this one lies entirely before the floor's month.
    let mut period = (lower_index - seed_index) / freq;

    loop {
        let index = seed_index.checked_add(period.checked_mul(freq)?)?;
        let (year, month) = split_month_index(index)?;
        // Past the representable calendar.
        NaiveDate::from_ymd_opt(year, month, 1)?;

        if let Some(date) = pick(year, month) {
            let candidate = date.and_time(time);
            if candidate >= floor {
                return Some(candidate);
            }
        }
        period += 1;
    }
}

/// Same month and day as the seed, every `frequency` years.
///
/// # Errors
/// Returns [`RepeatError::NonexistentDate`] when the year that would hold the
/// answer lacks the seed's date (Feb 29 outside leap years). Earlier years that
/// lack it are passed over, since they cannot contain the answer anyway.
pub fn yearly(
    seed: NaiveDateTime,
    lower: NaiveDateTime,
    frequency: NonZeroU32,
) -> Result<Option<NaiveDateTime>> {
    if seed >= lower {
        return Ok(Some(seed));
    }

    let freq = i64::from(frequency.get());
    let (month, day, time) = (seed.month(), seed.day(), seed.time());
    let seed_year = i64::from(seed.year());
    let mut period = (i64::from(lower.year()) - seed_year) / freq;

    loop {
        let Some(year) = period
            .checked_mul(freq)
            .and_then(|offset| seed_year.checked_add(offset))
            .and_then(|year| i32::try_from(year).ok())
        else {
            return Ok(None);
        };
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Ok(None);
        }

        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => {
                let candidate = date.and_time(time);
                if candidate >= lower {
                    return Ok(Some(candidate));
                }
            }
            None => {
                let before_lower = year < lower.year()
                    || (year == lower.year()
                        && (month, day, time) < (lower.month(), lower.day(), lower.time()));
                if !before_lower {
                    tracing::debug!(year, month, day, %seed, "yearly step hit a nonexistent date");
                    return Err(RepeatError::NonexistentDate { year, month, day });
                }
            }
        }
        period += 1;
    }
}

/// The `ordinal`-th `weekday` of the given month, if the month has one.
pub fn weekday_in_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: WeekdayOrdinal,
) -> Option<NaiveDate> {
    match ordinal {
        WeekdayOrdinal::Last => {
            let last = last_day_of_month(year, month)?;
            let back = (last.weekday().num_days_from_monday() + 7
                - weekday.num_days_from_monday())
                % 7;
            NaiveDate::from_ymd_opt(year, month, last.day() - back)
        }
        nth => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let ahead = (weekday.num_days_from_monday() + 7
                - first.weekday().num_days_from_monday())
                % 7;
            let week = u32::try_from(nth.number() - 1).ok()?;
            NaiveDate::from_ymd_opt(year, month, 1 + ahead + 7 * week)
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn split_month_index(index: i64) -> Option<(i32, u32)> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    Some((year, month))
}
