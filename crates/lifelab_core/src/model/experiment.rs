//! Experiment domain model.
//!
//! # Responsibility
//! - Define the canonical experiment record, its daily logs and review.
//! - Provide lifecycle helpers for complete/reopen and upsert-by-day logging.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another experiment.
//! - `updated_at` is monotonic: it only moves forward, never rolls back.
//! - At most one log entry exists per calendar day (upsert-by-day).
//! - `completed_at` is present iff `status == ExperimentStatus::Completed`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an experiment record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ExperimentId = Uuid;

/// Stable identifier for a single daily log entry.
pub type LogEntryId = Uuid;

/// Lifecycle state of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    /// Still being run and recorded.
    Active,
    /// Finished; `completed_at` carries the completion instant.
    Completed,
}

/// Five-level mood scale attached to daily logs.
///
/// Ordered worst to best. Analytics treats the value as opaque; only the
/// display layer cares about the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    VeryBad,
    Bad,
    Neutral,
    Good,
    VeryGood,
}

impl Mood {
    /// All levels in scale order, worst first.
    pub const ALL: [Mood; 5] = [
        Mood::VeryBad,
        Mood::Bad,
        Mood::Neutral,
        Mood::Good,
        Mood::VeryGood,
    ];

    /// Display glyph for this level.
    pub fn glyph(self) -> &'static str {
        match self {
            Mood::VeryBad => "😖",
            Mood::Bad => "🙁",
            Mood::Neutral => "😐",
            Mood::Good => "🙂",
            Mood::VeryGood => "😄",
        }
    }
}

/// One journal entry for one calendar day of one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    /// Stable entry id, preserved across upsert-by-day rewrites.
    pub uuid: LogEntryId,
    /// Calendar day this entry belongs to. Time of day is irrelevant.
    pub date: NaiveDate,
    /// Free-text note body.
    pub note: String,
    /// Optional mood for the day.
    pub mood: Option<Mood>,
}

/// Closing review for a completed experiment.
///
/// Once `locked` is set the answers are read-only until the experiment is
/// reopened, which clears the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// What actually happened during the experiment.
    pub outcome: String,
    /// What the user learned from it.
    pub learned: String,
    /// What the user wants to try next.
    pub next_step: String,
    /// Read-only marker set when the review flow is finished.
    pub locked: bool,
}

/// Canonical record for one tracked life experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Stable global ID used for linking and auditing.
    pub uuid: ExperimentId,
    /// Non-empty display title.
    pub title: String,
    /// Optional free-text category. Not validated against the catalog.
    pub category: Option<String>,
    /// Optional free-text subcategory.
    pub subcategory: Option<String>,
    /// Lifecycle state.
    pub status: ExperimentStatus,
    /// Creation instant in Unix epoch milliseconds.
    pub created_at: i64,
    /// Last-touch instant in epoch milliseconds. Never moves backward.
    pub updated_at: i64,
    /// Completion instant. `Some` iff `status == Completed`.
    pub completed_at: Option<i64>,
    /// Daily log entries, at most one per calendar day.
    pub logs: Vec<DailyLogEntry>,
    /// Optional closing review.
    pub review: Option<Review>,
}

/// Validation failure for a structurally broken experiment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// `updated_at` is earlier than `created_at`.
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
    /// `completed_at` presence does not match `status`.
    CompletionMismatch { status: ExperimentStatus },
    /// Two log entries share the same calendar day.
    DuplicateLogDay(NaiveDate),
}

impl Display for ExperimentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "experiment title must not be empty"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at {updated_at} is earlier than created_at {created_at}"
            ),
            Self::CompletionMismatch { status } => write!(
                f,
                "completed_at presence does not match status {status:?}"
            ),
            Self::DuplicateLogDay(date) => {
                write!(f, "more than one log entry for day {date}")
            }
        }
    }
}

impl Error for ExperimentValidationError {}

impl ExperimentRecord {
    /// Creates a new active experiment with a generated stable ID.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now_ms`.
    /// - Status starts as `Active` with no logs and no review.
    pub fn new(title: impl Into<String>, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4(), title, now_ms)
    }

    /// Creates a new experiment with a caller-provided stable ID.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(uuid: ExperimentId, title: impl Into<String>, now_ms: i64) -> Self {
        Self {
            uuid,
            title: title.into(),
            category: None,
            subcategory: None,
            status: ExperimentStatus::Active,
            created_at: now_ms,
            updated_at: now_ms,
            completed_at: None,
            logs: Vec::new(),
            review: None,
        }
    }

    /// Returns whether this experiment is still being run.
    pub fn is_active(&self) -> bool {
        self.status == ExperimentStatus::Active
    }

    /// Category trimmed of surrounding whitespace, `None` when blank.
    pub fn trimmed_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns the log entry for `date`, if one exists.
    pub fn log_on(&self, date: NaiveDate) -> Option<&DailyLogEntry> {
        self.logs.iter().find(|entry| entry.date == date)
    }

    /// Moves `updated_at` forward to `now_ms`.
    ///
    /// A stale `now_ms` is ignored so the monotonicity invariant holds even
    /// when callers race each other with out-of-order clocks.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = self.updated_at.max(now_ms);
    }

    /// Upserts the daily log entry for `date` and returns its stable id.
    ///
    /// # Contract
    /// - A second save on the same day overwrites note/mood in place; the
    ///   entry keeps its id and position in the sequence.
    /// - Bumps `updated_at` to `now_ms`.
    pub fn log_day(
        &mut self,
        date: NaiveDate,
        note: impl Into<String>,
        mood: Option<Mood>,
        now_ms: i64,
    ) -> LogEntryId {
        self.touch(now_ms);
        if let Some(existing) = self.logs.iter_mut().find(|entry| entry.date == date) {
            existing.note = note.into();
            existing.mood = mood;
            return existing.uuid;
        }

        let entry = DailyLogEntry {
            uuid: Uuid::new_v4(),
            date,
            note: note.into(),
            mood,
        };
        let id = entry.uuid;
        self.logs.push(entry);
        id
    }

    /// Transitions to `Completed`, stamping `completed_at = now_ms`.
    ///
    /// `updated_at` is frozen at the completion instant. Completing an
    /// already completed record is a no-op.
    pub fn complete(&mut self, now_ms: i64) {
        if self.status == ExperimentStatus::Completed {
            return;
        }
        self.status = ExperimentStatus::Completed;
        self.completed_at = Some(now_ms);
        self.touch(now_ms);
    }

    /// Reopens a completed experiment for further recording.
    ///
    /// Clears `completed_at` and unlocks the review. Reopening an active
    /// record is a no-op.
    pub fn reopen(&mut self, now_ms: i64) {
        if self.status == ExperimentStatus::Active {
            return;
        }
        self.status = ExperimentStatus::Active;
        self.completed_at = None;
        if let Some(review) = self.review.as_mut() {
            review.locked = false;
        }
        self.touch(now_ms);
    }

    /// Replaces review answers, preserving the current lock flag.
    pub fn save_review(
        &mut self,
        outcome: impl Into<String>,
        learned: impl Into<String>,
        next_step: impl Into<String>,
        now_ms: i64,
    ) {
        let locked = self.review.as_ref().map_or(false, |review| review.locked);
        self.review = Some(Review {
            outcome: outcome.into(),
            learned: learned.into(),
            next_step: next_step.into(),
            locked,
        });
        self.touch(now_ms);
    }

    /// Marks the review read-only. No-op when no review exists.
    pub fn lock_review(&mut self, now_ms: i64) {
        if let Some(review) = self.review.as_mut() {
            review.locked = true;
            self.touch(now_ms);
        }
    }

    /// Checks structural invariants of this record.
    ///
    /// # Errors
    /// Returns the first violated invariant; callers on write paths must
    /// reject the record instead of persisting it.
    pub fn validate(&self) -> Result<(), ExperimentValidationError> {
        if self.title.trim().is_empty() {
            return Err(ExperimentValidationError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(ExperimentValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        let completed = self.status == ExperimentStatus::Completed;
        if completed != self.completed_at.is_some() {
            return Err(ExperimentValidationError::CompletionMismatch {
                status: self.status,
            });
        }
        for (index, entry) in self.logs.iter().enumerate() {
            if self.logs[..index].iter().any(|prior| prior.date == entry.date) {
                return Err(ExperimentValidationError::DuplicateLogDay(entry.date));
            }
        }
        Ok(())
    }
}
