//! Property-based tests for occurrence search using proptest.
//!
//! These check invariants that should hold for any rule built from the closed
//! set of patterns, not just the examples in `search_tests.rs`.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use repeat_engine::{next_occurrence_after, RepeatKind, RepeatRule};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = RepeatKind> {
    prop_oneof![
        Just(RepeatKind::None),
        Just(RepeatKind::Daily),
        Just(RepeatKind::Weekly),
        Just(RepeatKind::MonthlyByDate),
        Just(RepeatKind::MonthlyByWeekday),
        Just(RepeatKind::Yearly),
        Just(RepeatKind::Manual),
    ]
}

/// Instants in 2024-2026. Day is capped at 28 so yearly seeds never sit on Feb 29.
fn arb_instant() -> impl Strategy<Value = NaiveDateTime> {
    (2024i32..=2026, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59).prop_map(|(y, m, d, h, min)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    })
}

#[derive(Debug, Clone)]
struct Case {
    rule: RepeatRule,
    seed: NaiveDateTime,
    after: NaiveDateTime,
}

/// A rule with optional end date and repeating additions, a primary seed and a
/// lower bound somewhere from a month before the seed to a few years after it.
fn arb_case(with_one_offs: bool) -> impl Strategy<Value = Case> {
    (
        arb_kind(),
        1i64..=4,
        1i64..=6,
        proptest::option::of(arb_instant()),
        proptest::collection::vec((arb_instant(), any::<bool>()), 0..3),
        arb_instant(),
        -30i64..=1200,
        0i64..=1439,
    )
        .prop_map(
            move |(kind, frequency, ordinal, end_date, additions, seed, day_offset, minute_offset)| {
                let mut builder = RepeatRule::builder()
                    .kind(kind)
                    .frequency(frequency)
                    .ordinal(ordinal);
                if let Some(end) = end_date {
                    builder = builder.end_date(end);
                }
                for (id, (date, repeats)) in additions.into_iter().enumerate() {
                    builder = builder.addition(id as i64, date, repeats || !with_one_offs);
                }
                let after = seed
                    + TimeDelta::days(day_offset)
                    + TimeDelta::minutes(minute_offset);
                Case {
                    rule: builder.build().expect("strategy builds valid rules"),
                    seed,
                    after,
                }
            },
        )
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: The result is never before the lower bound
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn result_not_before_lower_bound(case in arb_case(true)) {
        let next = next_occurrence_after(&case.rule, case.seed, case.after).unwrap();
        if let Some(occurrence) = next {
            prop_assert!(occurrence >= case.after, "{occurrence} < {}", case.after);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Minimality -- any bound between `after` and the result yields
// the same result, so nothing was skipped in between
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn no_occurrence_skipped(case in arb_case(true), fraction in 0i32..=4) {
        let next = next_occurrence_after(&case.rule, case.seed, case.after).unwrap();
        if let Some(occurrence) = next {
            let between = case.after + (occurrence - case.after) * fraction / 4;
            prop_assert_eq!(
                next_occurrence_after(&case.rule, case.seed, between).unwrap(),
                Some(occurrence)
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Strict progress -- stepping one second past a result never
// returns it again
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn strict_progress(case in arb_case(true)) {
        let next = next_occurrence_after(&case.rule, case.seed, case.after).unwrap();
        if let Some(occurrence) = next {
            let following = next_occurrence_after(
                &case.rule,
                case.seed,
                occurrence + TimeDelta::seconds(1),
            )
            .unwrap();
            if let Some(later) = following {
                prop_assert!(later > occurrence, "{later} <= {occurrence}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Bound respect -- without one-off additions, nothing exceeds the
// end date
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn end_date_respected(case in arb_case(false)) {
        let next = next_occurrence_after(&case.rule, case.seed, case.after).unwrap();
        if let (Some(occurrence), Some(end)) = (next, case.rule.end_date()) {
            prop_assert!(occurrence <= end, "{occurrence} > {end}");
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Time of day is preserved for every seed progression
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn time_of_day_preserved(case in arb_case(false)) {
        let next = next_occurrence_after(&case.rule, case.seed, case.after).unwrap();
        if let Some(occurrence) = next {
            let seed_times: Vec<_> = std::iter::once(case.seed.time())
                .chain(case.rule.additions().map(|a| a.date.time()))
                .collect();
            prop_assert!(seed_times.contains(&occurrence.time()));
        }
    }
}
