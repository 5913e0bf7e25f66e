//! Tests for converting upstream repeat records into rules.

use chrono::{NaiveDate, NaiveDateTime};
use repeat_engine::{next_occurrence_after, RepeatError, RepeatKind, RepeatRecord, RepeatRule};

fn dt(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn rule_from_json(json: &str) -> Result<RepeatRule, RepeatError> {
    let record: RepeatRecord = serde_json::from_str(json).expect("record should deserialize");
    RepeatRule::try_from(record)
}

#[test]
fn full_record_converts() {
    let rule = rule_from_json(
        r#"{
            "repeat_id": 32,
            "repeat_frequence": 1,
            "repeat_option_id": 6,
            "repeat_until": "2024-12-31T23:59:59",
            "additions": [
                {"id": 11, "add_date": "2024-03-10T09:00:00"},
                {"id": 12, "add_date": "2024-04-02T09:00:00", "repeats": true}
            ],
            "exceptions": [
                {"id": 21, "except_date_start": "2024-02-23T09:00:00"}
            ]
        }"#,
    )
    .expect("valid record");

    assert!(rule.is_monthly_by_last_weekday());
    assert_eq!(rule.frequency().map(|f| f.get()), Some(1));
    assert_eq!(
        rule.end_date(),
        NaiveDate::from_ymd_opt(2024, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59))
    );
    assert_eq!(rule.additions().count(), 2);
    assert!(!rule.addition(11).unwrap().repeats);
    assert!(rule.addition(12).unwrap().repeats);
    assert_eq!(rule.exceptions().count(), 1);

    // The one-off on 2024-03-10 comes before the last Friday of March.
    let next = next_occurrence_after(&rule, dt(2024, 1, 26, 9, 0), dt(2024, 3, 1, 0, 0));
    assert_eq!(next, Ok(Some(dt(2024, 3, 10, 9, 0))));
}

#[test]
fn empty_record_is_a_non_repeating_rule() {
    let rule = rule_from_json("{}").expect("defaults are valid");
    assert_eq!(rule.kind(), RepeatKind::None);
    assert_eq!(rule.end_date(), None);
    assert_eq!(rule.additions().count(), 0);
}

#[test]
fn unknown_repeat_id_is_rejected() {
    let err = rule_from_json(r#"{"repeat_id": 3, "repeat_frequence": 1}"#).unwrap_err();
    assert_eq!(err, RepeatError::UnknownKind(3));
}

#[test]
fn monthly_by_weekday_without_option_is_rejected() {
    let err = rule_from_json(r#"{"repeat_id": 32, "repeat_frequence": 1}"#).unwrap_err();
    assert_eq!(err, RepeatError::MissingOrdinal);

    let err = rule_from_json(r#"{"repeat_id": 32, "repeat_frequence": 1, "repeat_option_id": 9}"#)
        .unwrap_err();
    assert_eq!(err, RepeatError::InvalidOrdinal(9));
}

#[test]
fn repeating_record_without_frequency_is_rejected() {
    let err = rule_from_json(r#"{"repeat_id": 7}"#).unwrap_err();
    assert_eq!(err, RepeatError::MissingFrequency);
}

#[test]
fn duplicate_addition_ids_keep_the_last() {
    let rule = rule_from_json(
        r#"{
            "repeat_id": 1,
            "repeat_frequence": 2,
            "additions": [
                {"id": 5, "add_date": "2024-03-10T09:00:00"},
                {"id": 5, "add_date": "2024-05-10T09:00:00"}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(rule.additions().count(), 1);
    assert_eq!(rule.addition(5).unwrap().date, dt(2024, 5, 10, 9, 0));
}
