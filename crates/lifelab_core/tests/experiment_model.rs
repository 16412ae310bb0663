use chrono::NaiveDate;
use lifelab_core::{ExperimentRecord, ExperimentStatus, ExperimentValidationError, Mood};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn new_record_starts_active_with_matching_timestamps() {
    let record = ExperimentRecord::new("cold showers", 1_000);

    assert_eq!(record.status, ExperimentStatus::Active);
    assert_eq!(record.created_at, 1_000);
    assert_eq!(record.updated_at, 1_000);
    assert!(record.completed_at.is_none());
    assert!(record.logs.is_empty());
    assert!(record.review.is_none());
    record.validate().unwrap();
}

#[test]
fn log_day_upserts_instead_of_appending() {
    let mut record = ExperimentRecord::new("journaling", 1_000);
    let day = date(2024, 3, 10);

    let first_id = record.log_day(day, "felt rough", Some(Mood::Bad), 2_000);
    let second_id = record.log_day(day, "better after lunch", Some(Mood::Good), 3_000);

    assert_eq!(first_id, second_id);
    assert_eq!(record.logs.len(), 1);
    assert_eq!(record.logs[0].note, "better after lunch");
    assert_eq!(record.logs[0].mood, Some(Mood::Good));
    assert_eq!(record.updated_at, 3_000);
}

#[test]
fn updated_at_never_rolls_back() {
    let mut record = ExperimentRecord::new("meditation", 5_000);
    record.touch(2_000);
    assert_eq!(record.updated_at, 5_000);

    record.log_day(date(2024, 3, 10), "note", None, 1_000);
    assert_eq!(record.updated_at, 5_000);
}

#[test]
fn complete_and_reopen_manage_completed_at_and_review_lock() {
    let mut record = ExperimentRecord::new("no sugar", 1_000);
    record.save_review("went well", "sugar is everywhere", "try 30 days", 2_000);
    record.lock_review(2_500);
    record.complete(3_000);

    assert_eq!(record.status, ExperimentStatus::Completed);
    assert_eq!(record.completed_at, Some(3_000));
    assert!(record.review.as_ref().unwrap().locked);
    record.validate().unwrap();

    record.reopen(4_000);
    assert_eq!(record.status, ExperimentStatus::Active);
    assert!(record.completed_at.is_none());
    assert!(!record.review.as_ref().unwrap().locked);
    record.validate().unwrap();
}

#[test]
fn complete_twice_keeps_first_completion_instant() {
    let mut record = ExperimentRecord::new("daily walk", 1_000);
    record.complete(2_000);
    record.complete(9_000);
    assert_eq!(record.completed_at, Some(2_000));
}

#[test]
fn validate_rejects_blank_title() {
    let record = ExperimentRecord::new("   ", 1_000);
    assert_eq!(
        record.validate().unwrap_err(),
        ExperimentValidationError::EmptyTitle
    );
}

#[test]
fn validate_rejects_completion_mismatch() {
    let mut record = ExperimentRecord::new("stretching", 1_000);
    record.completed_at = Some(2_000);

    let err = record.validate().unwrap_err();
    assert!(matches!(
        err,
        ExperimentValidationError::CompletionMismatch { .. }
    ));
}

#[test]
fn validate_rejects_duplicate_log_days() {
    let mut record = ExperimentRecord::new("reading", 1_000);
    record.log_day(date(2024, 3, 10), "a", None, 2_000);
    let mut duplicate = record.logs[0].clone();
    duplicate.uuid = uuid::Uuid::new_v4();
    record.logs.push(duplicate);

    assert_eq!(
        record.validate().unwrap_err(),
        ExperimentValidationError::DuplicateLogDay(date(2024, 3, 10))
    );
}

#[test]
fn trimmed_category_filters_blank_values() {
    let mut record = ExperimentRecord::new("sleep earlier", 1_000);
    assert_eq!(record.trimmed_category(), None);

    record.category = Some("   ".to_string());
    assert_eq!(record.trimmed_category(), None);

    record.category = Some("  Sleep ".to_string());
    assert_eq!(record.trimmed_category(), Some("Sleep"));
}

#[test]
fn every_mood_level_has_a_distinct_glyph() {
    let glyphs: std::collections::HashSet<_> =
        Mood::ALL.iter().map(|mood| mood.glyph()).collect();
    assert_eq!(glyphs.len(), Mood::ALL.len());
}

#[test]
fn record_serializes_with_snake_case_enums() {
    let mut record = ExperimentRecord::new("cold showers", 1_000);
    record.log_day(date(2024, 3, 10), "brr", Some(Mood::VeryGood), 2_000);

    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"active\""));
    assert!(json.contains("\"very_good\""));

    let parsed: ExperimentRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, record);
}
