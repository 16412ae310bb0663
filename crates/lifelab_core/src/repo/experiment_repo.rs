//! Experiment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `experiments`, `daily_logs` and `reviews`.
//! - Serve the full-record snapshot consumed by the analytics engine.
//!
//! # Invariants
//! - Write paths call `ExperimentRecord::validate()` before SQL mutations.
//! - `update_experiment` replaces logs and review wholesale in one
//!   transaction, so the stored shape always matches the in-memory record.
//! - `list_experiments` returns a deterministic order:
//!   `created_at ASC, uuid ASC` (creation/insertion order).

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::experiment::{
    DailyLogEntry, ExperimentId, ExperimentRecord, ExperimentStatus, ExperimentValidationError,
    Mood, Review,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EXPERIMENT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    category,
    subcategory,
    status,
    created_at,
    updated_at,
    completed_at
FROM experiments";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for experiment persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ExperimentValidationError),
    Db(DbError),
    NotFound(ExperimentId),
    InvalidData(String),
    /// The connection has not been migrated to the expected schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// A table required by this repository is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "experiment not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted experiment data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExperimentValidationError> for RepoError {
    fn from(value: ExperimentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for experiment CRUD and snapshot access.
pub trait ExperimentRepository {
    /// Persists a new experiment with its logs and review.
    fn create_experiment(&mut self, record: &ExperimentRecord) -> RepoResult<ExperimentId>;
    /// Replaces the stored record, logs and review wholesale.
    fn update_experiment(&mut self, record: &ExperimentRecord) -> RepoResult<()>;
    /// Gets one experiment by stable id.
    fn get_experiment(&self, id: ExperimentId) -> RepoResult<Option<ExperimentRecord>>;
    /// Returns the full record snapshot in creation order.
    fn list_experiments(&self) -> RepoResult<Vec<ExperimentRecord>>;
    /// Hard-deletes an experiment and its dependent rows.
    fn delete_experiment(&mut self, id: ExperimentId) -> RepoResult<()>;
}

/// SQLite-backed experiment repository.
pub struct SqliteExperimentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteExperimentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `MissingRequiredTable` when a required table is absent.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in ["experiments", "daily_logs", "reviews"] {
            let exists: i64 = conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
                );",
                [table],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }

        Ok(Self { conn })
    }
}

impl ExperimentRepository for SqliteExperimentRepository<'_> {
    fn create_experiment(&mut self, record: &ExperimentRecord) -> RepoResult<ExperimentId> {
        record.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO experiments (
                uuid,
                title,
                category,
                subcategory,
                status,
                created_at,
                updated_at,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                record.uuid.to_string(),
                record.title.as_str(),
                record.category.as_deref(),
                record.subcategory.as_deref(),
                status_to_db(record.status),
                record.created_at,
                record.updated_at,
                record.completed_at,
            ],
        )?;
        insert_logs(&tx, record)?;
        insert_review(&tx, record)?;
        tx.commit()?;

        Ok(record.uuid)
    }

    fn update_experiment(&mut self, record: &ExperimentRecord) -> RepoResult<()> {
        record.validate()?;

        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE experiments
             SET
                title = ?1,
                category = ?2,
                subcategory = ?3,
                status = ?4,
                created_at = ?5,
                updated_at = ?6,
                completed_at = ?7
             WHERE uuid = ?8;",
            params![
                record.title.as_str(),
                record.category.as_deref(),
                record.subcategory.as_deref(),
                status_to_db(record.status),
                record.created_at,
                record.updated_at,
                record.completed_at,
                record.uuid.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(record.uuid));
        }

        tx.execute(
            "DELETE FROM daily_logs WHERE experiment_uuid = ?1;",
            [record.uuid.to_string()],
        )?;
        tx.execute(
            "DELETE FROM reviews WHERE experiment_uuid = ?1;",
            [record.uuid.to_string()],
        )?;
        insert_logs(&tx, record)?;
        insert_review(&tx, record)?;
        tx.commit()?;

        Ok(())
    }

    fn get_experiment(&self, id: ExperimentId) -> RepoResult<Option<ExperimentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EXPERIMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;

        if let Some(row) = rows.next()? {
            let mut record = parse_experiment_row(row)?;
            load_dependents(self.conn, &mut record)?;
            record.validate()?;
            return Ok(Some(record));
        }

        Ok(None)
    }

    fn list_experiments(&self) -> RepoResult<Vec<ExperimentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EXPERIMENT_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let mut record = parse_experiment_row(row)?;
            load_dependents(self.conn, &mut record)?;
            record.validate()?;
            records.push(record);
        }

        Ok(records)
    }

    fn delete_experiment(&mut self, id: ExperimentId) -> RepoResult<()> {
        // Dependent rows cascade via foreign keys.
        let changed = self.conn.execute(
            "DELETE FROM experiments WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn insert_logs(conn: &Connection, record: &ExperimentRecord) -> RepoResult<()> {
    for entry in &record.logs {
        conn.execute(
            "INSERT INTO daily_logs (uuid, experiment_uuid, log_date, note, mood)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry.uuid.to_string(),
                record.uuid.to_string(),
                entry.date.format("%Y-%m-%d").to_string(),
                entry.note.as_str(),
                entry.mood.map(mood_to_db),
            ],
        )?;
    }
    Ok(())
}

fn insert_review(conn: &Connection, record: &ExperimentRecord) -> RepoResult<()> {
    if let Some(review) = &record.review {
        conn.execute(
            "INSERT INTO reviews (experiment_uuid, outcome, learned, next_step, locked)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.uuid.to_string(),
                review.outcome.as_str(),
                review.learned.as_str(),
                review.next_step.as_str(),
                i64::from(review.locked),
            ],
        )?;
    }
    Ok(())
}

fn load_dependents(conn: &Connection, record: &mut ExperimentRecord) -> RepoResult<()> {
    let uuid = record.uuid.to_string();

    let mut stmt = conn.prepare(
        "SELECT uuid, log_date, note, mood
         FROM daily_logs
         WHERE experiment_uuid = ?1
         ORDER BY log_date ASC;",
    )?;
    let mut rows = stmt.query([uuid.as_str()])?;
    while let Some(row) = rows.next()? {
        record.logs.push(parse_log_row(row)?);
    }

    let mut stmt = conn.prepare(
        "SELECT outcome, learned, next_step, locked
         FROM reviews
         WHERE experiment_uuid = ?1;",
    )?;
    let mut rows = stmt.query([uuid.as_str()])?;
    if let Some(row) = rows.next()? {
        record.review = Some(Review {
            outcome: row.get("outcome")?,
            learned: row.get("learned")?,
            next_step: row.get("next_step")?,
            locked: row.get::<_, i64>("locked")? != 0,
        });
    }

    Ok(())
}

fn parse_experiment_row(row: &Row<'_>) -> RepoResult<ExperimentRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "experiments.uuid")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in experiments.status"
        ))
    })?;

    Ok(ExperimentRecord {
        uuid,
        title: row.get("title")?,
        category: row.get("category")?,
        subcategory: row.get("subcategory")?,
        status,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        completed_at: row.get("completed_at")?,
        logs: Vec::new(),
        review: None,
    })
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<DailyLogEntry> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "daily_logs.uuid")?;

    let date_text: String = row.get("log_date")?;
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid log date `{date_text}` in daily_logs.log_date"
        ))
    })?;

    let mood = match row.get::<_, Option<String>>("mood")? {
        Some(value) => Some(parse_mood(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid mood `{value}` in daily_logs.mood"))
        })?),
        None => None,
    };

    Ok(DailyLogEntry {
        uuid,
        date,
        note: row.get("note")?,
        mood,
    })
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn status_to_db(status: ExperimentStatus) -> &'static str {
    match status {
        ExperimentStatus::Active => "active",
        ExperimentStatus::Completed => "completed",
    }
}

fn parse_status(value: &str) -> Option<ExperimentStatus> {
    match value {
        "active" => Some(ExperimentStatus::Active),
        "completed" => Some(ExperimentStatus::Completed),
        _ => None,
    }
}

fn mood_to_db(mood: Mood) -> &'static str {
    match mood {
        Mood::VeryBad => "very_bad",
        Mood::Bad => "bad",
        Mood::Neutral => "neutral",
        Mood::Good => "good",
        Mood::VeryGood => "very_good",
    }
}

fn parse_mood(value: &str) -> Option<Mood> {
    match value {
        "very_bad" => Some(Mood::VeryBad),
        "bad" => Some(Mood::Bad),
        "neutral" => Some(Mood::Neutral),
        "good" => Some(Mood::Good),
        "very_good" => Some(Mood::VeryGood),
        _ => None,
    }
}
