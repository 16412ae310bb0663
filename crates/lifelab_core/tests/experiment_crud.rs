use chrono::NaiveDate;
use lifelab_core::db::migrations::latest_version;
use lifelab_core::db::open_db_in_memory;
use lifelab_core::{
    CreateExperimentRequest, ExperimentRecord, ExperimentRepository, ExperimentService,
    ExperimentStatus, Mood, RepoError, ServiceError, SqliteExperimentRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(title: &str, category: Option<&str>) -> CreateExperimentRequest {
    CreateExperimentRequest {
        title: title.to_string(),
        category: category.map(str::to_string),
        subcategory: None,
    }
}

#[test]
fn create_and_get_roundtrip_preserves_logs_and_review() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();

    let mut record = ExperimentRecord::new("cold showers", 1_000);
    record.category = Some("Health".to_string());
    record.log_day(date(2024, 3, 10), "brr", Some(Mood::Good), 2_000);
    record.save_review("survived", "mornings work best", "extend to 60s", 3_000);
    let id = repo.create_experiment(&record).unwrap();

    let loaded = repo.get_experiment(id).unwrap().unwrap();
    assert_eq!(loaded.uuid, record.uuid);
    assert_eq!(loaded.title, "cold showers");
    assert_eq!(loaded.category.as_deref(), Some("Health"));
    assert_eq!(loaded.status, ExperimentStatus::Active);
    assert_eq!(loaded.logs.len(), 1);
    assert_eq!(loaded.logs[0].date, date(2024, 3, 10));
    assert_eq!(loaded.logs[0].mood, Some(Mood::Good));
    let review = loaded.review.unwrap();
    assert_eq!(review.outcome, "survived");
    assert!(!review.locked);
}

#[test]
fn get_missing_experiment_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();
    assert!(repo.get_experiment(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn update_not_found_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();

    let record = ExperimentRecord::new("missing", 1_000);
    let err = repo.update_experiment(&record).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == record.uuid));
}

#[test]
fn validation_failure_blocks_create() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();

    let invalid = ExperimentRecord::new("  ", 1_000);
    let err = repo.create_experiment(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn list_returns_creation_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();

    let first = ExperimentRecord::new("first", 1_000);
    let second = ExperimentRecord::new("second", 2_000);
    let third = ExperimentRecord::new("third", 3_000);
    repo.create_experiment(&third).unwrap();
    repo.create_experiment(&first).unwrap();
    repo.create_experiment(&second).unwrap();

    let listed = repo.list_experiments().unwrap();
    let titles: Vec<_> = listed.iter().map(|record| record.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[test]
fn delete_removes_record_and_dependents() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();

    let mut record = ExperimentRecord::new("short lived", 1_000);
    record.log_day(date(2024, 3, 10), "note", None, 2_000);
    record.save_review("done", "meh", "nothing", 3_000);
    let id = repo.create_experiment(&record).unwrap();

    repo.delete_experiment(id).unwrap();
    assert!(repo.get_experiment(id).unwrap().is_none());
    drop(repo);

    let log_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM daily_logs;", [], |row| row.get(0))
        .unwrap();
    let review_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM reviews;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(log_rows, 0);
    assert_eq!(review_rows, 0);
}

#[test]
fn delete_missing_experiment_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();

    let id = Uuid::new_v4();
    let err = repo.delete_experiment(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    match SqliteExperimentRepository::try_new(&mut conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteExperimentRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("experiments"))
    ));
}

#[test]
fn service_record_day_upserts_by_calendar_day() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();
    let mut service = ExperimentService::new(repo);

    let created = service
        .create_experiment(&request("journaling", None), 1_000)
        .unwrap();
    let day = date(2024, 3, 10);

    let first_id = service
        .record_day(created.uuid, day, "rough start", Some(Mood::Bad), 2_000)
        .unwrap();
    let second_id = service
        .record_day(created.uuid, day, "picked up later", Some(Mood::Good), 3_000)
        .unwrap();
    assert_eq!(first_id, second_id);

    let loaded = service.get_experiment(created.uuid).unwrap().unwrap();
    assert_eq!(loaded.logs.len(), 1);
    assert_eq!(loaded.logs[0].note, "picked up later");
    assert_eq!(loaded.logs[0].mood, Some(Mood::Good));
    assert_eq!(loaded.updated_at, 3_000);
}

#[test]
fn service_complete_and_reopen_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();
    let mut service = ExperimentService::new(repo);

    let created = service
        .create_experiment(&request("no sugar", Some("Health")), 1_000)
        .unwrap();

    let completed = service.complete_experiment(created.uuid, 5_000).unwrap();
    assert_eq!(completed.status, ExperimentStatus::Completed);
    assert_eq!(completed.completed_at, Some(5_000));

    let reopened = service.reopen_experiment(created.uuid, 6_000).unwrap();
    assert_eq!(reopened.status, ExperimentStatus::Active);
    assert!(reopened.completed_at.is_none());
}

#[test]
fn service_locked_review_rejects_edits_until_reopen() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();
    let mut service = ExperimentService::new(repo);

    let created = service
        .create_experiment(&request("meditation", None), 1_000)
        .unwrap();

    service
        .save_review(created.uuid, "calmer", "mornings help", "longer sits", 2_000)
        .unwrap();
    service.lock_review(created.uuid, 3_000).unwrap();

    let err = service
        .save_review(created.uuid, "other", "other", "other", 4_000)
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReviewLocked(id) if id == created.uuid));

    service.complete_experiment(created.uuid, 5_000).unwrap();
    service.reopen_experiment(created.uuid, 6_000).unwrap();

    let updated = service
        .save_review(created.uuid, "calmer still", "evenings too", "keep going", 7_000)
        .unwrap();
    assert_eq!(updated.review.unwrap().outcome, "calmer still");
}

#[test]
fn service_lock_review_without_review_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();
    let mut service = ExperimentService::new(repo);

    let created = service
        .create_experiment(&request("stretching", None), 1_000)
        .unwrap();

    let err = service.lock_review(created.uuid, 2_000).unwrap_err();
    assert!(matches!(err, ServiceError::ReviewMissing(id) if id == created.uuid));
}

#[test]
fn service_operations_on_missing_experiment_return_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteExperimentRepository::try_new(&mut conn).unwrap();
    let mut service = ExperimentService::new(repo);

    let id = Uuid::new_v4();
    let err = service
        .record_day(id, date(2024, 3, 10), "note", None, 1_000)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(missing) if missing == id));
}
